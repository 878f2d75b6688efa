//! Gameweek command implementation

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::common::{explain_failure, open_session, print_json};
use crate::cli::types::{Gameweek, PlayerId};
use crate::state::State;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveScorer {
    pub id: PlayerId,
    pub name: String,
    pub points: i32,
    pub minutes: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameweekReport {
    pub gameweek: Option<Gameweek>,
    pub name: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub top_scorers: Vec<LiveScorer>,
}

/// Summarise the current gameweek from a loaded state.
pub fn build_report(state: &State, top: usize) -> GameweekReport {
    let info = &state.general_information;
    let event = state.gameweek.and_then(|gw| info.event(gw));
    let top_scorers = state
        .gameweek_data
        .as_ref()
        .map(|data| {
            data.top_scorers(top)
                .into_iter()
                .map(|live| LiveScorer {
                    id: live.id,
                    name: info
                        .element(live.id)
                        .map(|e| e.web_name.clone())
                        .unwrap_or_else(|| live.id.to_string()),
                    points: live.stats.total_points,
                    minutes: live.stats.minutes,
                })
                .collect()
        })
        .unwrap_or_default();

    GameweekReport {
        gameweek: state.gameweek,
        name: event.map(|e| e.name.clone()),
        deadline: event.map(|e| e.deadline_time),
        top_scorers,
    }
}

pub fn render_report(report: &GameweekReport) -> String {
    let mut out = match (report.gameweek, &report.deadline) {
        (Some(gw), Some(deadline)) => format!(
            "{} (gameweek {}), deadline {}\n",
            report.name.as_deref().unwrap_or("Gameweek"),
            gw,
            deadline.format("%a %d %b %H:%M UTC")
        ),
        (Some(gw), None) => format!("Gameweek {}\n", gw),
        _ => "No upcoming gameweek: the season is over.\n".to_string(),
    };
    if !report.top_scorers.is_empty() {
        out.push_str("Top live scorers:\n");
        for (rank, scorer) in report.top_scorers.iter().enumerate() {
            out.push_str(&format!(
                "{:>2}. {:<20} {:>3} pts ({} mins)\n",
                rank + 1,
                scorer.name,
                scorer.points,
                scorer.minutes
            ));
        }
    }
    out
}

/// Handle the gameweek command
pub async fn handle_gameweek(refresh: bool, top: usize, as_json: bool) -> Result<()> {
    let session = open_session(refresh).await?;
    let report = session.store().select(|s| build_report(s, top));
    if as_json {
        print_json(&report).map_err(|e| explain_failure(&session, e))
    } else {
        print!("{}", render_report(&report)); // tarpaulin::skip
        Ok(())
    }
}
