//! The manager data chain: picks, then transfers, then resolved players.
//!
//! Each step awaits the previous one, and every result is committed only if
//! the store still shows the same manager and gameweek the run started with.
//! A run that loses that race stops with [`PipelineOutcome::Superseded`] and
//! leaves the newer view alone.

use tracing::{debug, info, warn};

use crate::cli::types::{Gameweek, TeamId};
use crate::fpl::service::DataService;
use crate::state::{resolve_players, Action, LatestError, Store, User};
use crate::{FplError, Result};

pub const PICKS_ERROR_MESSAGE: &str = "Unable to Load Managers Team By Gameweek";
pub const TRANSFERS_ERROR_MESSAGE: &str = "Unable to Load Managers Transfers By Gameweek";
pub const PLAYERS_ERROR_MESSAGE: &str = "Unable to match Managers Team to Player Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    FetchingPicks,
    FetchingTransfers,
    ResolvingPlayers,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// `user.players` now holds this many resolved players.
    Ready { players: usize },
    /// The store moved on to another manager or gameweek mid-run.
    Superseded,
    /// No gameweek is known yet, so there is nothing to fetch.
    Skipped,
}

pub struct ManagerPipeline<'a, D: DataService + ?Sized> {
    store: &'a Store,
    service: &'a D,
    team_id: TeamId,
    stage: PipelineStage,
}

impl<'a, D: DataService + ?Sized> ManagerPipeline<'a, D> {
    pub fn new(store: &'a Store, service: &'a D, team_id: TeamId) -> Self {
        Self {
            store,
            service,
            team_id,
            stage: PipelineStage::Idle,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Picks are for the gameweek before the current one, clamped to 1.
    /// Unlike a plain `gameweek - 1`, gameweek 1 asks for its own picks
    /// rather than a non-existent gameweek 0.
    pub fn picks_gameweek(gameweek: Gameweek) -> Gameweek {
        gameweek.previous()
    }

    pub async fn run(&mut self) -> Result<PipelineOutcome> {
        let Some(gameweek) = self.store.select(|s| s.gameweek) else {
            debug!(team = %self.team_id, "no gameweek yet, skipping manager load");
            return Ok(PipelineOutcome::Skipped);
        };
        if !self.is_current(gameweek) {
            return Ok(self.superseded());
        }

        self.stage = PipelineStage::FetchingPicks;
        let picks_gameweek = Self::picks_gameweek(gameweek);
        debug!(team = %self.team_id, gameweek = %picks_gameweek, "fetching picks");
        let team = match self.service.manager_picks(self.team_id, picks_gameweek).await {
            Ok(team) => team,
            Err(e) => return Err(self.fail(gameweek, e, PICKS_ERROR_MESSAGE, false)),
        };
        let picks = team.picks.clone();
        if !self.commit(gameweek, |user| user.team = Some(team)) {
            return Ok(self.superseded());
        }

        self.stage = PipelineStage::FetchingTransfers;
        debug!(team = %self.team_id, "fetching transfers");
        let transfers = match self.service.manager_transfers(self.team_id).await {
            Ok(transfers) => transfers,
            Err(e) => return Err(self.fail(gameweek, e, TRANSFERS_ERROR_MESSAGE, false)),
        };
        if !self.commit(gameweek, |user| user.transfers = transfers) {
            return Ok(self.superseded());
        }

        self.stage = PipelineStage::ResolvingPlayers;
        let resolved = self
            .store
            .select(|s| resolve_players(&picks, &s.general_information.elements));
        let players = match resolved {
            Ok(players) => players,
            Err(e) => return Err(self.fail(gameweek, e, PLAYERS_ERROR_MESSAGE, true)),
        };
        let count = players.len();
        if !self.commit(gameweek, |user| {
            user.players = players;
            user.loaded_information = true;
        }) {
            return Ok(self.superseded());
        }

        self.stage = PipelineStage::Ready;
        info!(team = %self.team_id, players = count, "manager loaded");
        Ok(PipelineOutcome::Ready { players: count })
    }

    fn is_current(&self, gameweek: Gameweek) -> bool {
        self.store.select(|s| {
            s.user.team_id == Some(self.team_id) && s.gameweek == Some(gameweek)
        })
    }

    /// Apply `update` to the user record and replace it wholesale, unless the
    /// store no longer shows this run's manager and gameweek.
    fn commit(&self, gameweek: Gameweek, update: impl FnOnce(&mut User)) -> bool {
        let mut applied = false;
        self.store.dispatch_with(|state| {
            if state.user.team_id != Some(self.team_id) || state.gameweek != Some(gameweek) {
                return Action::Unknown;
            }
            let mut user = state.user.clone();
            update(&mut user);
            applied = true;
            Action::set_user(user)
        });
        applied
    }

    fn superseded(&mut self) -> PipelineOutcome {
        debug!(team = %self.team_id, stage = ?self.stage, "manager load superseded");
        self.stage = PipelineStage::Idle;
        PipelineOutcome::Superseded
    }

    fn fail(&mut self, gameweek: Gameweek, err: FplError, message: &str, fatal: bool) -> FplError {
        warn!(team = %self.team_id, stage = ?self.stage, error = %err, "{}", message);
        self.stage = PipelineStage::Failed;
        if self.is_current(gameweek) {
            self.store
                .report_error(LatestError::from_error(&err, message, fatal));
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpl::service::tests_support::{Failure, FakeData};
    use crate::fpl::types::TransferRecord;
    use crate::cli::types::PlayerId;
    use std::sync::Arc;

    const TEAM: TeamId = TeamId(1234);

    fn loaded_store(data: &FakeData) -> Arc<Store> {
        let store = Arc::new(Store::default());
        let info = data.info.lock().unwrap().clone();
        store.dispatch(Action::set_general_information(info));
        store.dispatch(Action::set_user(User {
            team_id: Some(TEAM),
            ..User::default()
        }));
        store
    }

    #[test]
    fn test_picks_gameweek_steps_back_but_not_past_first() {
        assert_eq!(
            ManagerPipeline::<FakeData>::picks_gameweek(Gameweek::new(5)),
            Gameweek::new(4)
        );
        assert_eq!(
            ManagerPipeline::<FakeData>::picks_gameweek(Gameweek::new(1)),
            Gameweek::new(1)
        );
    }

    #[tokio::test]
    async fn test_chain_runs_in_order_and_resolves_players() {
        let data = FakeData::with_events(&[(4, -24), (5, 24)]).with_squad(&[1, 2, 3, 4], &[3, 1, 4]);
        data.transfers.lock().unwrap().push(TransferRecord {
            element_in: PlayerId::new(3),
            element_out: PlayerId::new(2),
            ..TransferRecord::default()
        });
        let store = loaded_store(&data);

        let mut pipeline = ManagerPipeline::new(&store, &data, TEAM);
        let outcome = pipeline.run().await.unwrap();

        assert_eq!(outcome, PipelineOutcome::Ready { players: 3 });
        assert_eq!(pipeline.stage(), PipelineStage::Ready);
        assert_eq!(
            data.call_log(),
            vec!["manager_picks:1234:4", "manager_transfers:1234"]
        );

        let user = store.get_state().user;
        assert!(user.loaded_information);
        assert_eq!(user.transfers.len(), 1);
        let ids: Vec<u32> = user.players.iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![3, 1, 4]);
        assert_eq!(user.team.unwrap().picks.len(), 3);
    }

    #[tokio::test]
    async fn test_first_gameweek_fetches_gameweek_one() {
        let data = FakeData::with_events(&[(1, 24), (2, 48)]).with_squad(&[1], &[1]);
        let store = loaded_store(&data);
        ManagerPipeline::new(&store, &data, TEAM).run().await.unwrap();
        assert_eq!(data.calls("manager_picks"), 1);
        assert_eq!(data.call_log()[0], "manager_picks:1234:1");
    }

    #[tokio::test]
    async fn test_skipped_without_gameweek() {
        let data = FakeData::with_events(&[(1, -48), (2, -24)]);
        let store = loaded_store(&data);
        let outcome = ManagerPipeline::new(&store, &data, TEAM).run().await.unwrap();
        assert_eq!(outcome, PipelineOutcome::Skipped);
        assert!(data.call_log().is_empty());
    }

    #[tokio::test]
    async fn test_picks_failure_is_non_fatal_and_stops_chain() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1], &[1]);
        data.fail("manager_picks", Failure::Upstream);
        let store = loaded_store(&data);

        let mut pipeline = ManagerPipeline::new(&store, &data, TEAM);
        assert!(pipeline.run().await.unwrap_err().is_upstream());
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert_eq!(data.calls("manager_transfers"), 0);

        let error = store.get_state().latest_error.unwrap();
        assert_eq!(error.message, PICKS_ERROR_MESSAGE);
        assert!(!error.is_fatal);
    }

    #[tokio::test]
    async fn test_transfers_rate_limit_is_non_fatal() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1], &[1]);
        data.fail("manager_transfers", Failure::RateLimit);
        let store = loaded_store(&data);

        let err = ManagerPipeline::new(&store, &data, TEAM).run().await.unwrap_err();
        assert!(err.is_rate_limit());
        let state = store.get_state();
        let error = state.latest_error.unwrap();
        assert_eq!(error.message, TRANSFERS_ERROR_MESSAGE);
        assert_eq!(error.error.name, "RateLimitExceeded");
        assert!(!error.is_fatal);
        // Picks landed before the failure; players were never resolved.
        assert!(state.user.team.is_some());
        assert!(!state.user.loaded_information);
    }

    #[tokio::test]
    async fn test_unresolvable_pick_is_fatal() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1, 2], &[1, 2, 99]);
        let store = loaded_store(&data);

        let mut pipeline = ManagerPipeline::new(&store, &data, TEAM);
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, FplError::DataConsistency { expected: 3, found: 2 }));
        assert_eq!(pipeline.stage(), PipelineStage::Failed);

        let state = store.get_state();
        assert!(state.has_fatal_error());
        assert_eq!(state.latest_error.unwrap().error.name, "DataConsistencyError");
        assert!(state.user.players.is_empty());
        assert!(!state.user.loaded_information);
    }

    #[tokio::test]
    async fn test_switching_manager_mid_run_discards_results() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1, 2], &[1, 2]);
        let store = loaded_store(&data);
        let other = store.clone();
        data.set_hook(move |endpoint| {
            if endpoint == "manager_picks" {
                other.dispatch(Action::set_user(User {
                    team_id: Some(TeamId::new(999)),
                    ..User::default()
                }));
            }
        });

        let mut pipeline = ManagerPipeline::new(&store, &data, TEAM);
        assert_eq!(pipeline.run().await.unwrap(), PipelineOutcome::Superseded);
        assert_eq!(data.calls("manager_transfers"), 0);

        let user = store.get_state().user;
        assert_eq!(user.team_id, Some(TeamId::new(999)));
        assert!(user.team.is_none());
    }

    #[tokio::test]
    async fn test_gameweek_change_mid_run_discards_results() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1, 2], &[1, 2]);
        let store = loaded_store(&data);
        let other = store.clone();
        data.set_hook(move |endpoint| {
            if endpoint == "manager_transfers" {
                other.dispatch(Action::SetGameweek {
                    gameweek: Some(Gameweek::new(6)),
                });
            }
        });

        let outcome = ManagerPipeline::new(&store, &data, TEAM).run().await.unwrap();
        assert_eq!(outcome, PipelineOutcome::Superseded);
        let user = store.get_state().user;
        assert!(user.team.is_some());
        assert!(user.transfers.is_empty());
        assert!(!user.loaded_information);
    }

    #[tokio::test]
    async fn test_failure_after_supersession_is_not_reported() {
        let data = FakeData::with_events(&[(5, 24)]).with_squad(&[1], &[1]);
        data.fail("manager_picks", Failure::Upstream);
        let store = loaded_store(&data);
        let other = store.clone();
        data.set_hook(move |_| {
            other.dispatch(Action::set_user(User::default()));
        });

        assert!(ManagerPipeline::new(&store, &data, TEAM).run().await.is_err());
        assert!(store.get_state().latest_error.is_none());
    }
}
