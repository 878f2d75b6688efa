//! Transfers command implementation

use super::common::{explain_failure, open_session, print_json};
use super::resolve_team_id;
use crate::cli::types::TeamId;
use crate::fpl::types::TransferResponse;
use crate::pipeline::PipelineOutcome;
use crate::{FplError, Result};

/// Parameters for the transfers command
#[derive(Debug, Clone)]
pub struct TransfersParams {
    pub team_id: Option<TeamId>,
    pub model: Option<String>,
    pub horizon: u32,
    pub transfers: u32,
    pub refresh: bool,
    pub as_json: bool,
}

pub fn render_transfers(response: &TransferResponse) -> String {
    if response.pairs.is_empty() {
        return "No transfers suggested.\n".to_string();
    }
    let mut out = String::new();
    for pair in &response.pairs {
        out.push_str(&format!(
            "OUT {:<20} IN {:<20} gain {:+.2}  cost {:.1}\n",
            pair.player_out_name, pair.player_in_name, pair.gain, pair.cost
        ));
    }
    out.push_str(&format!(
        "Total: gain {:+.2}, cost {:.1}\n",
        response.gain, response.cost
    ));
    out
}

/// Handle the transfers command
pub async fn handle_transfers(params: TransfersParams) -> Result<()> {
    let team_id = resolve_team_id(params.team_id)?;
    let session = open_session(params.refresh).await?;

    match session.load_manager(team_id).await {
        Ok(PipelineOutcome::Ready { .. }) => {}
        Ok(PipelineOutcome::Skipped) => return Err(FplError::NoGameweek),
        Ok(PipelineOutcome::Superseded) => return Ok(()),
        Err(e) => return Err(explain_failure(&session, e)),
    }
    session.update_filters(params.model, params.horizon, params.transfers)?;

    let response = session
        .suggest_transfers()
        .await
        .map_err(|e| explain_failure(&session, e))?;
    if params.as_json {
        return print_json(&response);
    }
    print!("{}", render_transfers(&response)); // tarpaulin::skip
    Ok(())
}
