//! Composition root: one store, one limiter per upstream, and the policies
//! that turn service failures into user-visible errors.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::types::{Gameweek, PlayerId, TeamId};
use crate::core::{bootstrap_cache_path, Clock, ClientConfig, RateLimiter, SystemClock};
use crate::fpl::bootstrap::load_or_fetch_general_information;
use crate::fpl::http::FplClient;
use crate::fpl::optimiser::OptimiserClient;
use crate::fpl::service::{DataService, OptimiserService, TransferQuery};
use crate::fpl::types::{PredictionResponse, TransferResponse};
use crate::pipeline::{ManagerPipeline, PipelineOutcome};
use crate::state::{Action, Filters, LatestError, Store, User};
use crate::{FplError, Result};

pub const GENERAL_INFORMATION_ERROR_MESSAGE: &str = "Unable to load General Information";
pub const GAMEWEEK_DATA_ERROR_MESSAGE: &str = "Unable to load Gameweek Data";
pub const PREDICTIONS_ERROR_MESSAGE: &str = "Unable to load Predictions";
pub const TRANSFERS_SUGGESTION_ERROR_MESSAGE: &str = "Unable to suggest Transfers";

/// How a failed call is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// Nothing works without it: a fatal error.
    Critical,
    /// The user asked for it: a dismissable error.
    Required,
    /// Logged only.
    BestEffort,
}

pub struct Session<D: ?Sized, O: ?Sized> {
    store: Arc<Store>,
    data: Arc<D>,
    optimiser: Arc<O>,
    cache_path: Option<PathBuf>,
}

impl Session<FplClient, OptimiserClient> {
    /// Build the real clients. Each upstream gets exactly one limiter, shared
    /// by every call made through this session.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
        let fpl_limiter = RateLimiter::with_clock("fpl", config.fpl_limits, clock.clone());
        let optimiser_limiter =
            RateLimiter::with_clock("optimiser", config.optimiser_limits, clock.clone());

        let data = FplClient::new(&config.fpl_base_url, fpl_limiter)?;
        let optimiser = OptimiserClient::new(&config.optimiser_base_url, optimiser_limiter)?;
        debug!(
            fpl = %config.fpl_base_url,
            optimiser = %config.optimiser_base_url,
            "session configured"
        );

        Ok(Self::new(Arc::new(Store::new(clock)), Arc::new(data), Arc::new(optimiser))
            .with_cache_path(Some(bootstrap_cache_path())))
    }
}

impl<D, O> Session<D, O>
where
    D: DataService + ?Sized,
    O: OptimiserService + ?Sized,
{
    pub fn new(store: Arc<Store>, data: Arc<D>, optimiser: Arc<O>) -> Self {
        Self {
            store,
            data,
            optimiser,
            cache_path: None,
        }
    }

    /// Where the bootstrap document is cached. `None` disables the cache.
    pub fn with_cache_path(mut self, path: Option<PathBuf>) -> Self {
        self.cache_path = path;
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn optimiser(&self) -> &O {
        &self.optimiser
    }

    /// The current error if it is fatal.
    pub fn fatal_error(&self) -> Option<LatestError> {
        self.store
            .select(|s| s.latest_error.clone().filter(|e| e.is_fatal))
    }

    fn surface(&self, err: &FplError, message: &str, severity: Severity) {
        let fatal = match severity {
            Severity::Critical => true,
            Severity::Required => false,
            Severity::BestEffort => {
                warn!(error = %err, "{}", message);
                return;
            }
        };
        self.store
            .report_error(LatestError::from_error(err, message, fatal));
    }

    /// Load general information (which derives the gameweek), then fixtures,
    /// then the live data for the derived gameweek. A manager chosen before
    /// any gameweek was known has their team loaded once one is.
    pub async fn bootstrap(&self, refresh: bool) -> Result<()> {
        let info = match load_or_fetch_general_information(
            &*self.data,
            self.cache_path.as_deref(),
            refresh,
        )
        .await
        {
            Ok(info) => info,
            Err(e) => {
                self.surface(&e, GENERAL_INFORMATION_ERROR_MESSAGE, Severity::Critical);
                return Err(e);
            }
        };
        self.store.dispatch(Action::set_general_information(info));
        info!(gameweek = ?self.store.select(|s| s.gameweek), "general information loaded");

        match self.data.fixtures().await {
            Ok(fixtures) => self.store.dispatch(Action::SetFixtures { fixtures }),
            Err(e) => self.surface(&e, "Unable to load Fixtures", Severity::BestEffort),
        }

        self.refresh_gameweek_data().await?;

        let waiting = self
            .store
            .select(|s| s.user.team_id.is_some() && s.user.team.is_none());
        if waiting {
            self.reload_manager().await;
        }
        Ok(())
    }

    /// Rerun the manager chain for the current manager, if there is one.
    /// Failures are already surfaced by the pipeline, so they are only logged.
    async fn reload_manager(&self) {
        let Some(team_id) = self.store.select(|s| s.user.team_id) else {
            return;
        };
        match ManagerPipeline::new(&self.store, &*self.data, team_id).run().await {
            Ok(outcome) => debug!(team = %team_id, ?outcome, "manager reloaded"),
            Err(e) => debug!(team = %team_id, error = %e, "manager reload failed"),
        }
    }

    /// Fetch live stats for the current gameweek, or clear them when there
    /// is none. A response for a gameweek that is no longer current is
    /// dropped.
    pub async fn refresh_gameweek_data(&self) -> Result<()> {
        let Some(gameweek) = self.store.select(|s| s.gameweek) else {
            self.store.dispatch(Action::SetGameweekData {
                gameweek_data: None,
            });
            return Ok(());
        };

        let data = match self.data.gameweek_live(gameweek).await {
            Ok(data) => data,
            Err(e) => {
                if self.store.select(|s| s.gameweek) == Some(gameweek) {
                    self.surface(&e, GAMEWEEK_DATA_ERROR_MESSAGE, Severity::Critical);
                }
                return Err(e);
            }
        };

        self.store.dispatch_with(|state| {
            if state.gameweek == Some(gameweek) {
                Action::SetGameweekData {
                    gameweek_data: Some(data),
                }
            } else {
                debug!(%gameweek, "discarding live data for a stale gameweek");
                Action::Unknown
            }
        });
        Ok(())
    }

    /// Step the gameweek by `delta` (never below 1), then reload its live
    /// data and the current manager's team for it.
    pub async fn change_gameweek(&self, delta: i32) -> Result<Gameweek> {
        let current = self
            .store
            .select(|s| s.gameweek)
            .ok_or(FplError::NoGameweek)?;
        let next = current.offset(delta);
        self.store.dispatch(Action::SetGameweek {
            gameweek: Some(next),
        });
        self.refresh_gameweek_data().await?;
        self.reload_manager().await;
        Ok(next)
    }

    /// Make `team_id` the current manager and run the picks, transfers,
    /// players chain for them.
    pub async fn load_manager(&self, team_id: TeamId) -> Result<PipelineOutcome> {
        self.store.dispatch(Action::set_user(User {
            team_id: Some(team_id),
            ..User::default()
        }));
        ManagerPipeline::new(&self.store, &*self.data, team_id)
            .run()
            .await
    }

    /// Validate and store new filters.
    pub fn update_filters(
        &self,
        model: Option<String>,
        horizon: u32,
        transfers: u32,
    ) -> Result<Filters> {
        let gameweek = self.store.select(|s| s.gameweek);
        let filters = Filters::validated(model, horizon, transfers, gameweek)?;
        self.store.dispatch(Action::SetFilters {
            filters: filters.clone(),
        });
        Ok(filters)
    }

    /// Ask the backend for predictions with the current filters. The
    /// loading flag is cleared whether or not the call succeeds.
    pub async fn request_predictions(&self) -> Result<PredictionResponse> {
        let filters = self.store.select(|s| s.filters.clone());
        let Some(model) = filters.model else {
            let err = FplError::InvalidFilters {
                reason: "a prediction model must be selected".to_string(),
            };
            self.surface(&err, PREDICTIONS_ERROR_MESSAGE, Severity::Required);
            return Err(err);
        };

        self.store.dispatch(Action::SetIsLoading { is_loading: true });
        self.store.dispatch(Action::SetLoadingPercent {
            loading_percent: 0.0,
        });

        let result = self
            .optimiser
            .make_predictions(&model, filters.horizon)
            .await;

        match &result {
            Ok(response) => {
                self.store.dispatch(Action::SetLoadingPercent {
                    loading_percent: 100.0,
                });
                self.store.dispatch(Action::SetPredictionResponse {
                    prediction_response: Some(response.clone()),
                });
            }
            Err(e) => self.surface(e, PREDICTIONS_ERROR_MESSAGE, Severity::Required),
        }
        self.store
            .dispatch(Action::SetIsLoading { is_loading: false });
        result
    }

    /// Transfer suggestions for the loaded manager. The result is returned,
    /// not stored.
    pub async fn suggest_transfers(&self) -> Result<TransferResponse> {
        let (user, filters) = self.store.select(|s| (s.user.clone(), s.filters.clone()));
        let team_id = match user.team_id {
            Some(id) if user.loaded_information => id,
            _ => {
                return Err(FplError::NotLoaded {
                    what: "manager team".to_string(),
                })
            }
        };

        let query = TransferQuery {
            team_id,
            horizon: filters.horizon,
            transfers: filters.transfers,
            elements: user.players.iter().map(|p| p.id).collect::<Vec<PlayerId>>(),
        };
        match self.optimiser.optimise_transfers(&query).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.surface(&e, TRANSFERS_SUGGESTION_ERROR_MESSAGE, Severity::Required);
                Err(e)
            }
        }
    }
}
