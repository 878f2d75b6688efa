//! Wire types for the FPL API and the optimisation backend.
//!
//! Only the fields the assistant reads are declared; anything else in the
//! payloads is ignored. Most fields default so that partial fixtures and
//! older payloads still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::cli::types::{Gameweek, PlayerId, TeamId};


/// `bootstrap-static/`: everything about the season in one document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneralInformation {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub game_settings: Option<Value>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub total_players: Option<u64>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub element_stats: Vec<ElementStat>,
    #[serde(default)]
    pub element_types: Vec<ElementType>,
}

impl GeneralInformation {
    pub fn element(&self, id: PlayerId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn event(&self, id: Gameweek) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn element_type(&self, id: u8) -> Option<&ElementType> {
        self.element_types.iter().find(|t| t.id == id)
    }
}

/// A gameweek and its transfer deadline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Event {
    pub id: Gameweek,
    #[serde(default)]
    pub name: String,
    pub deadline_time: DateTime<Utc>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub average_entry_score: Option<i32>,
    #[serde(default)]
    pub highest_score: Option<i32>,
}

/// A Premier League club.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub strength: Option<u8>,
}

/// A player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Element {
    pub id: PlayerId,
    #[serde(default)]
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    /// Club id.
    #[serde(default)]
    pub team: u32,
    /// Position id (see [`ElementType`]).
    #[serde(default)]
    pub element_type: u8,
    /// Price in tenths of a million.
    #[serde(default)]
    pub now_cost: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub selected_by_percent: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub photo: String,
}

impl Element {
    /// Price in millions, e.g. `10.5`.
    pub fn price(&self) -> f64 {
        f64::from(self.now_cost) / 10.0
    }
}

/// A position: GKP, DEF, MID, FWD.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ElementType {
    pub id: u8,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub singular_name_short: String,
    #[serde(default)]
    pub plural_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ElementStat {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
}

/// A run of gameweeks (overall season, calendar months).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Phase {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_event: u16,
    #[serde(default)]
    pub stop_event: u16,
}

/// One side's contribution to a match statistic.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchStat {
    pub value: i32,
    pub element: PlayerId,
}

/// One statistic (goals, assists, cards, bonus, saves...) of a match, split by side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchStatsEntry {
    pub identifier: String,
    #[serde(default)]
    pub a: Vec<MatchStat>,
    #[serde(default)]
    pub h: Vec<MatchStat>,
}

/// A match. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Fixture {
    pub id: u32,
    #[serde(default)]
    pub code: u64,
    /// Gameweek, or `None` while the match is unscheduled.
    #[serde(default)]
    pub event: Option<Gameweek>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub finished_provisional: bool,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub minutes: u16,
    #[serde(default)]
    pub provisional_start_time: bool,
    #[serde(default)]
    pub started: Option<bool>,
    pub team_a: u32,
    #[serde(default)]
    pub team_a_score: Option<u8>,
    pub team_h: u32,
    #[serde(default)]
    pub team_h_score: Option<u8>,
    #[serde(default)]
    pub team_h_difficulty: u8,
    #[serde(default)]
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub pulse_id: u64,
    #[serde(default)]
    pub stats: Vec<MatchStatsEntry>,
}

impl Fixture {
    pub fn involves(&self, team: u32) -> bool {
        self.team_h == team || self.team_a == team
    }

    /// Difficulty faced by `team` in this fixture, if it plays in it.
    pub fn difficulty_for(&self, team: u32) -> Option<u8> {
        if self.team_h == team {
            Some(self.team_h_difficulty)
        } else if self.team_a == team {
            Some(self.team_a_difficulty)
        } else {
            None
        }
    }

    pub fn stat(&self, identifier: &str) -> Option<&MatchStatsEntry> {
        self.stats.iter().find(|s| s.identifier == identifier)
    }
}

/// The picks a manager made for one gameweek.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ManagersTeam {
    #[serde(default)]
    pub active_chip: Option<String>,
    #[serde(default)]
    pub automatic_subs: Vec<Value>,
    #[serde(default)]
    pub entry_history: EntryHistory,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EntryHistory {
    #[serde(default)]
    pub event: u16,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub rank: Option<u64>,
    #[serde(default)]
    pub overall_rank: Option<u64>,
    /// Money in the bank, in tenths of a million.
    #[serde(default)]
    pub bank: i32,
    /// Squad value, in tenths of a million.
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub event_transfers: u32,
    #[serde(default)]
    pub event_transfers_cost: i32,
    #[serde(default)]
    pub points_on_bench: i32,
}

/// One squad slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Pick {
    pub element: PlayerId,
    #[serde(default)]
    pub position: u8,
    #[serde(default)]
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    #[serde(default)]
    pub element_type: u8,
}

/// A transfer the manager made (`entry/{id}/transfers/`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransferRecord {
    pub element_in: PlayerId,
    #[serde(default)]
    pub element_in_cost: i32,
    pub element_out: PlayerId,
    #[serde(default)]
    pub element_out_cost: i32,
    #[serde(default)]
    pub entry: Option<TeamId>,
    #[serde(default)]
    pub event: Option<Gameweek>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// `entry/{id}/`: a manager's season summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ManagerSummary {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    #[serde(default)]
    pub summary_overall_points: Option<i32>,
    #[serde(default)]
    pub summary_overall_rank: Option<u64>,
    #[serde(default)]
    pub current_event: Option<Gameweek>,
}

/// `element-summary/{id}/`: upcoming fixtures and history for one player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerSummary {
    #[serde(default)]
    pub fixtures: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub history_past: Vec<Value>,
}

/// `event/{gw}/live/`: per-player stats for one gameweek.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GameweekData {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

impl GameweekData {
    pub fn element(&self, id: PlayerId) -> Option<&LiveElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// The `n` highest scorers, best first.
    pub fn top_scorers(&self, n: usize) -> Vec<&LiveElement> {
        let mut ranked: Vec<&LiveElement> = self.elements.iter().collect();
        ranked.sort_by(|a, b| b.stats.total_points.cmp(&a.stats.total_points));
        ranked.truncate(n);
        ranked
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LiveElement {
    pub id: PlayerId,
    #[serde(default)]
    pub stats: LiveStats,
    #[serde(default)]
    pub explain: Vec<Explain>,
    #[serde(default)]
    pub modified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: u16,
    #[serde(default)]
    pub goals_scored: u16,
    #[serde(default)]
    pub assists: u16,
    #[serde(default)]
    pub clean_sheets: u16,
    #[serde(default)]
    pub bonus: u16,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub in_dreamteam: bool,
    /// Everything else (cards, saves, xG strings, ...).
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Explain {
    pub fixture: u32,
    #[serde(default)]
    pub stats: Vec<ExplainStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExplainStat {
    pub identifier: String,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub points_modification: i32,
}

/// A suggested swap from the optimiser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Transfer {
    pub cost: f64,
    pub gain: f64,
    #[serde(rename = "playerIn_name", default)]
    pub player_in_name: String,
    #[serde(rename = "playerOut_name", default)]
    pub player_out_name: String,
    #[serde(rename = "transferIn")]
    pub transfer_in: PlayerId,
    #[serde(rename = "transferOut")]
    pub transfer_out: PlayerId,
    #[serde(rename = "transferIn_metrics", default)]
    pub transfer_in_metrics: BTreeMap<String, f64>,
    #[serde(rename = "transferOut_metrics", default)]
    pub transfer_out_metrics: BTreeMap<String, f64>,
}

/// `optimise_transfers` result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransferResponse {
    #[serde(default)]
    pub pairs: Vec<Transfer>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub gain: f64,
}

/// `make_predictions` result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub current_target: String,
    #[serde(default)]
    pub elements: Vec<PredictionElement>,
}

impl PredictionResponse {
    pub fn element(&self, id: PlayerId) -> Option<&PredictionElement> {
        self.elements.iter().find(|e| e.element == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionElement {
    pub element: PlayerId,
    #[serde(default)]
    pub web_name: String,
    #[serde(default)]
    pub team: u32,
    #[serde(default)]
    pub element_type: u8,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub photo: String,
    /// Feature columns (rolling averages, season totals...).
    #[serde(flatten)]
    pub metrics: BTreeMap<String, Value>,
}

impl PredictionElement {
    /// A numeric feature column by name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(Value::as_f64)
    }
}
