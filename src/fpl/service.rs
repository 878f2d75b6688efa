//! The seam between orchestration code and the network.
//!
//! [`crate::session::Session`] and [`crate::pipeline::ManagerPipeline`] only
//! talk to these traits, so tests can drive them with in-process fakes.

use async_trait::async_trait;

use crate::cli::types::{Gameweek, PlayerId, TeamId};
use crate::fpl::types::{
    Fixture, GameweekData, GeneralInformation, ManagerSummary, ManagersTeam, PlayerSummary,
    PredictionResponse, TransferRecord, TransferResponse,
};
use crate::Result;

/// Reads from the public FPL API.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn general_information(&self) -> Result<GeneralInformation>;

    async fn fixtures(&self) -> Result<Vec<Fixture>>;

    async fn fixtures_by_gameweek(&self, gameweek: Gameweek) -> Result<Vec<Fixture>>;

    async fn player_summary(&self, player: PlayerId) -> Result<PlayerSummary>;

    async fn gameweek_live(&self, gameweek: Gameweek) -> Result<GameweekData>;

    async fn manager_summary(&self, team: TeamId) -> Result<ManagerSummary>;

    async fn manager_picks(&self, team: TeamId, gameweek: Gameweek) -> Result<ManagersTeam>;

    async fn manager_transfers(&self, team: TeamId) -> Result<Vec<TransferRecord>>;
}

/// Parameters the optimiser needs to suggest transfers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferQuery {
    pub team_id: TeamId,
    pub horizon: u32,
    pub transfers: u32,
    pub elements: Vec<PlayerId>,
}

/// Calls into the optimisation/prediction backend. Its results are computed
/// remotely and only displayed here.
#[async_trait]
pub trait OptimiserService: Send + Sync {
    async fn optimise_transfers(&self, query: &TransferQuery) -> Result<TransferResponse>;

    async fn optimise_team(&self, elements: &[PlayerId]) -> Result<serde_json::Value>;

    async fn make_predictions(&self, model: &str, horizon: u32) -> Result<PredictionResponse>;
}

#[cfg(test)]
pub(crate) mod tests_support;
