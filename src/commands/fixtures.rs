//! Fixtures command implementation

use serde::Serialize;

use super::common::{explain_failure, open_session, print_json};
use crate::cli::types::Gameweek;
use crate::fpl::fixtures::{difficulty_band, team_difficulty_summary, FixtureQuery, TeamDifficulty, Venue};
use crate::fpl::types::{Fixture, GeneralInformation};
use crate::{FplError, Result};

/// Parameters for the fixtures command
#[derive(Debug, Clone, Default)]
pub struct FixturesParams {
    pub gameweek: Option<Gameweek>,
    pub horizon: u16,
    pub team: Option<u32>,
    pub difficulty: Option<u8>,
    pub venue: Option<Venue>,
    pub summary: bool,
    pub as_json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureLine {
    pub gameweek: Option<Gameweek>,
    pub home: String,
    pub away: String,
    pub home_difficulty: u8,
    pub away_difficulty: u8,
    pub kickoff: Option<String>,
    pub score: Option<String>,
}

fn short_name(info: &GeneralInformation, team: u32) -> String {
    info.team(team)
        .map(|t| t.short_name.clone())
        .unwrap_or_else(|| format!("#{}", team))
}

pub fn fixture_line(fixture: &Fixture, info: &GeneralInformation) -> FixtureLine {
    let score = match (fixture.team_h_score, fixture.team_a_score) {
        (Some(h), Some(a)) => Some(format!("{}-{}", h, a)),
        _ => None,
    };
    FixtureLine {
        gameweek: fixture.event,
        home: short_name(info, fixture.team_h),
        away: short_name(info, fixture.team_a),
        home_difficulty: fixture.team_h_difficulty,
        away_difficulty: fixture.team_a_difficulty,
        kickoff: fixture
            .kickoff_time
            .map(|t| t.format("%a %d %b %H:%M").to_string()),
        score,
    }
}

pub fn render_fixtures(lines: &[FixtureLine]) -> String {
    if lines.is_empty() {
        return "No fixtures match.\n".to_string();
    }
    let mut out = String::new();
    for line in lines {
        let gw = line
            .gameweek
            .map(|g| format!("GW{:<2}", g))
            .unwrap_or_else(|| "TBC ".to_string());
        out.push_str(&format!(
            "{} {:>4} v {:<4} [{}|{}] {}\n",
            gw,
            line.home,
            line.away,
            line.home_difficulty,
            line.away_difficulty,
            line.score
                .as_deref()
                .or(line.kickoff.as_deref())
                .unwrap_or("")
        ));
    }
    out
}

pub fn render_summary(summary: &[TeamDifficulty]) -> String {
    let mut out = String::new();
    for row in summary {
        let rounded = row.average_difficulty.round().clamp(0.0, 255.0) as u8;
        out.push_str(&format!(
            "{:<4} {:>2} fixtures  avg {:.2} ({})\n",
            row.short_name,
            row.fixtures,
            row.average_difficulty,
            difficulty_band(rounded)
        ));
    }
    out
}

/// Handle the fixtures command
pub async fn handle_fixtures(params: FixturesParams) -> Result<()> {
    let session = open_session(false).await?;
    let (info, fixtures, current) = session.store().select(|s| {
        (
            s.general_information.clone(),
            s.fixtures.clone(),
            s.gameweek,
        )
    });
    let from = params
        .gameweek
        .or(current)
        .ok_or_else(|| explain_failure(&session, FplError::NoGameweek))?;

    if params.summary {
        let summary = team_difficulty_summary(&fixtures, &info.teams, from, params.horizon);
        if params.as_json {
            return print_json(&summary);
        }
        print!("{}", render_summary(&summary)); // tarpaulin::skip
        return Ok(());
    }

    let query = FixtureQuery {
        from_gameweek: Some(from),
        horizon: params.horizon,
        team: params.team,
        difficulty: params.difficulty,
        venue: params.venue,
    };
    let lines: Vec<FixtureLine> = query
        .apply(&fixtures)
        .into_iter()
        .map(|f| fixture_line(f, &info))
        .collect();
    if params.as_json {
        return print_json(&lines);
    }
    print!("{}", render_fixtures(&lines)); // tarpaulin::skip
    Ok(())
}
