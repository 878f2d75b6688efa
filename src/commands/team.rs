//! Team command implementation

use serde::Serialize;

use super::common::{explain_failure, format_price, open_session, player_line, print_json};
use super::resolve_team_id;
use crate::cli::types::{PlayerId, TeamId};
use crate::fpl::types::GeneralInformation;
use crate::pipeline::PipelineOutcome;
use crate::state::User;
use crate::{FplError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadSlot {
    pub position: u8,
    pub id: PlayerId,
    pub name: String,
    pub captain: bool,
    pub vice_captain: bool,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadReport {
    pub team_id: TeamId,
    pub gameweek: u16,
    pub points: i32,
    pub bank: i32,
    pub transfers: usize,
    pub squad: Vec<SquadSlot>,
}

/// Pair each pick with its resolved player. `user.players` is in pick order.
pub fn build_squad(team_id: TeamId, user: &User, info: &GeneralInformation) -> SquadReport {
    let team = user.team.clone().unwrap_or_default();
    let squad = team
        .picks
        .iter()
        .zip(user.players.iter())
        .map(|(pick, player)| SquadSlot {
            position: pick.position,
            id: player.id,
            name: player.web_name.clone(),
            captain: pick.is_captain,
            vice_captain: pick.is_vice_captain,
            line: player_line(player, info),
        })
        .collect();
    SquadReport {
        team_id,
        gameweek: team.entry_history.event,
        points: team.entry_history.points,
        bank: team.entry_history.bank,
        transfers: user.transfers.len(),
        squad,
    }
}

pub fn render_squad(report: &SquadReport) -> String {
    let mut out = format!(
        "Team {}: gameweek {} scored {} pts, {} in the bank, {} transfers made\n",
        report.team_id,
        report.gameweek,
        report.points,
        format_price(report.bank),
        report.transfers
    );
    for slot in &report.squad {
        if slot.position == 12 {
            out.push_str("-- bench --\n");
        }
        let armband = if slot.captain {
            "(C)"
        } else if slot.vice_captain {
            "(V)"
        } else {
            ""
        };
        out.push_str(&format!("{:>2}. {} {}\n", slot.position, slot.line, armband));
    }
    out
}

/// Handle the team command
pub async fn handle_team(team_id: Option<TeamId>, refresh: bool, as_json: bool) -> Result<()> {
    let team_id = resolve_team_id(team_id)?;
    let session = open_session(refresh).await?;

    match session.load_manager(team_id).await {
        Ok(PipelineOutcome::Ready { .. }) => {}
        Ok(PipelineOutcome::Skipped) => return Err(FplError::NoGameweek),
        Ok(PipelineOutcome::Superseded) => return Ok(()),
        Err(e) => return Err(explain_failure(&session, e)),
    }

    let report = session
        .store()
        .select(|s| build_squad(team_id, &s.user, &s.general_information));
    if as_json {
        return print_json(&report);
    }
    print!("{}", render_squad(&report)); // tarpaulin::skip
    Ok(())
}
