//! In-process fakes for the service traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};

use super::*;
use crate::fpl::types::{Element, Event, Pick, Team};
use crate::FplError;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Upstream,
    RateLimit,
}

impl Failure {
    fn into_error(self, endpoint: &str) -> FplError {
        match self {
            Failure::Upstream => FplError::Upstream {
                status: 500,
                url: format!("fake://{}", endpoint),
            },
            Failure::RateLimit => FplError::RateLimitExceeded {
                max_requests: 5,
                window_ms: 500,
            },
        }
    }
}

type Hook = Box<dyn Fn(&str) + Send + Sync>;

/// Canned FPL responses plus a call log.
#[derive(Default)]
pub(crate) struct FakeData {
    pub info: Mutex<GeneralInformation>,
    pub fixtures: Mutex<Vec<Fixture>>,
    pub picks: Mutex<ManagersTeam>,
    pub transfers: Mutex<Vec<TransferRecord>>,
    pub live: Mutex<HashMap<Gameweek, GameweekData>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    calls: Mutex<Vec<String>>,
    hook: Mutex<Option<Hook>>,
}

pub(crate) fn element(id: u32, team: u32) -> Element {
    Element {
        id: PlayerId::new(id),
        web_name: format!("Player {}", id),
        team,
        element_type: 3,
        now_cost: 50 + id as i32,
        ..Element::default()
    }
}

impl FakeData {
    /// Events `(id, hours from now)` for their deadlines.
    pub fn with_events(events: &[(u16, i64)]) -> Self {
        let now = Utc::now();
        let info = GeneralInformation {
            events: events
                .iter()
                .map(|&(id, hours)| Event {
                    id: Gameweek::new(id),
                    name: format!("Gameweek {}", id),
                    deadline_time: now + TimeDelta::hours(hours),
                    finished: hours < 0,
                    is_current: false,
                    is_next: false,
                    average_entry_score: None,
                    highest_score: None,
                })
                .collect(),
            teams: vec![
                Team {
                    id: 1,
                    name: "Arsenal".to_string(),
                    short_name: "ARS".to_string(),
                    strength: Some(4),
                },
                Team {
                    id: 2,
                    name: "Aston Villa".to_string(),
                    short_name: "AVL".to_string(),
                    strength: Some(3),
                },
            ],
            ..GeneralInformation::default()
        };
        Self {
            info: Mutex::new(info),
            ..Self::default()
        }
    }

    /// Known players `ids`; the manager picked `picked` of them.
    pub fn with_squad(self, ids: &[u32], picked: &[u32]) -> Self {
        self.info.lock().unwrap().elements = ids.iter().map(|&id| element(id, 1)).collect();
        self.picks.lock().unwrap().picks = picked
            .iter()
            .enumerate()
            .map(|(i, &id)| Pick {
                element: PlayerId::new(id),
                position: (i + 1) as u8,
                multiplier: 1,
                ..Pick::default()
            })
            .collect();
        self
    }

    pub fn fail(&self, endpoint: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(endpoint, failure);
    }

    pub fn set_hook(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(endpoint))
            .count()
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str, detail: String) -> crate::Result<()> {
        let entry = if detail.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}:{}", endpoint, detail)
        };
        self.calls.lock().unwrap().push(entry);
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(endpoint);
        }
        match self.failures.lock().unwrap().get(endpoint) {
            Some(failure) => Err(failure.into_error(endpoint)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataService for FakeData {
    async fn general_information(&self) -> crate::Result<GeneralInformation> {
        self.record("general_information", String::new())?;
        Ok(self.info.lock().unwrap().clone())
    }

    async fn fixtures(&self) -> crate::Result<Vec<Fixture>> {
        self.record("fixtures", String::new())?;
        Ok(self.fixtures.lock().unwrap().clone())
    }

    async fn fixtures_by_gameweek(&self, gameweek: Gameweek) -> crate::Result<Vec<Fixture>> {
        self.record("fixtures_by_gameweek", gameweek.to_string())?;
        Ok(self
            .fixtures
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.event == Some(gameweek))
            .cloned()
            .collect())
    }

    async fn player_summary(&self, player: PlayerId) -> crate::Result<PlayerSummary> {
        self.record("player_summary", player.to_string())?;
        Ok(PlayerSummary::default())
    }

    async fn gameweek_live(&self, gameweek: Gameweek) -> crate::Result<GameweekData> {
        self.record("gameweek_live", gameweek.to_string())?;
        Ok(self
            .live
            .lock()
            .unwrap()
            .get(&gameweek)
            .cloned()
            .unwrap_or_default())
    }

    async fn manager_summary(&self, team: TeamId) -> crate::Result<ManagerSummary> {
        self.record("manager_summary", team.to_string())?;
        Ok(ManagerSummary {
            id: team,
            ..ManagerSummary::default()
        })
    }

    async fn manager_picks(&self, team: TeamId, gameweek: Gameweek) -> crate::Result<ManagersTeam> {
        self.record("manager_picks", format!("{}:{}", team, gameweek))?;
        Ok(self.picks.lock().unwrap().clone())
    }

    async fn manager_transfers(&self, team: TeamId) -> crate::Result<Vec<TransferRecord>> {
        self.record("manager_transfers", team.to_string())?;
        Ok(self.transfers.lock().unwrap().clone())
    }
}

/// Canned optimiser that remembers what it was asked.
#[derive(Default)]
pub(crate) struct FakeOptimiser {
    pub transfer_queries: Mutex<Vec<TransferQuery>>,
    pub prediction_queries: Mutex<Vec<(String, u32)>>,
    pub response: Mutex<TransferResponse>,
    pub predictions: Mutex<PredictionResponse>,
    pub fail: Mutex<Option<Failure>>,
}

impl FakeOptimiser {
    fn check(&self, endpoint: &str) -> crate::Result<()> {
        match *self.fail.lock().unwrap() {
            Some(failure) => Err(failure.into_error(endpoint)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OptimiserService for FakeOptimiser {
    async fn optimise_transfers(&self, query: &TransferQuery) -> crate::Result<TransferResponse> {
        self.transfer_queries.lock().unwrap().push(query.clone());
        self.check("optimise_transfers")?;
        Ok(self.response.lock().unwrap().clone())
    }

    async fn optimise_team(&self, elements: &[PlayerId]) -> crate::Result<Value> {
        self.check("optimise_team")?;
        Ok(json!({ "elements": elements }))
    }

    async fn make_predictions(&self, model: &str, horizon: u32) -> crate::Result<PredictionResponse> {
        self.prediction_queries
            .lock()
            .unwrap()
            .push((model.to_string(), horizon));
        self.check("make_predictions")?;
        Ok(self.predictions.lock().unwrap().clone())
    }
}
