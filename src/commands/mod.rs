//! Command implementations for the FPL assistant CLI

pub mod common;
pub mod fixtures;
pub mod gameweek;
pub mod predict;
pub mod team;
pub mod transfers;

use crate::{FplError, Result, TeamId, TEAM_ID_ENV_VAR};


/// Resolve team ID from option or environment variable
pub fn resolve_team_id(team_id: Option<TeamId>) -> Result<TeamId> {
    resolve_team_id_with(team_id, |key| std::env::var(key).ok())
}

fn resolve_team_id_with(
    team_id: Option<TeamId>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TeamId> {
    if let Some(id) = team_id {
        return Ok(id);
    }
    match lookup(TEAM_ID_ENV_VAR) {
        Some(raw) => raw.parse::<TeamId>(),
        None => Err(FplError::MissingTeamId {
            env_var: TEAM_ID_ENV_VAR.to_string(),
        }),
    }
}
