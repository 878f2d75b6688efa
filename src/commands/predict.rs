//! Predict command implementation

use serde::Serialize;

use super::common::{explain_failure, open_session, print_json};
use crate::cli::types::PlayerId;
use crate::fpl::types::{GeneralInformation, PredictionResponse};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionLine {
    pub id: PlayerId,
    pub name: String,
    pub club: String,
    pub predicted_points: f64,
}

/// The `top` players by predicted points, best first.
pub fn rank_predictions(
    response: &PredictionResponse,
    info: &GeneralInformation,
    top: usize,
) -> Vec<PredictionLine> {
    let mut ranked: Vec<PredictionLine> = response
        .elements
        .iter()
        .map(|p| PredictionLine {
            id: p.element,
            name: if p.web_name.is_empty() {
                info.element(p.element)
                    .map(|e| e.web_name.clone())
                    .unwrap_or_else(|| p.element.to_string())
            } else {
                p.web_name.clone()
            },
            club: info
                .team(p.team)
                .map(|t| t.short_name.clone())
                .unwrap_or_default(),
            predicted_points: p.total_points,
        })
        .collect();
    ranked.sort_by(|a, b| b.predicted_points.total_cmp(&a.predicted_points));
    ranked.truncate(top);
    ranked
}

pub fn render_predictions(target: &str, lines: &[PredictionLine]) -> String {
    let mut out = if target.is_empty() {
        String::new()
    } else {
        format!("Predicted {}:\n", target)
    };
    for (rank, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<20} {:<4} {:>6.2}\n",
            rank + 1,
            line.name,
            line.club,
            line.predicted_points
        ));
    }
    out
}

/// Handle the predict command
pub async fn handle_predict(model: String, horizon: u32, top: usize, as_json: bool) -> Result<()> {
    let session = open_session(false).await?;
    session.update_filters(Some(model), horizon, 1)?;

    let response = session
        .request_predictions()
        .await
        .map_err(|e| explain_failure(&session, e))?;
    let lines = session
        .store()
        .select(|s| rank_predictions(&response, &s.general_information, top));
    if as_json {
        return print_json(&lines);
    }
    print!("{}", render_predictions(&response.current_target, &lines)); // tarpaulin::skip
    Ok(())
}
