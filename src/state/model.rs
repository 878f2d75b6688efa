//! The root state document and its field types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cli::types::time::FINAL_GAMEWEEK;
use crate::cli::types::{Gameweek, PlayerId, TeamId};
use crate::fpl::types::{
    Element, Fixture, GameweekData, GeneralInformation, ManagersTeam, PredictionResponse,
    TransferRecord,
};
use crate::{FplError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(FplError::InvalidTheme {
                value: other.to_string(),
            }),
        }
    }
}

/// The active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Landing,
    Development,
    Team,
    Fixtures,
    Info,
    Login,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Landing,
        Page::Development,
        Page::Team,
        Page::Fixtures,
        Page::Info,
        Page::Login,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Development => "development",
            Page::Team => "team",
            Page::Fixtures => "fixtures",
            Page::Info => "info",
            Page::Login => "login",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Page::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or(FplError::InvalidPage { value: wanted })
    }
}

/// The manager being inspected and everything loaded for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unset until the user enters a team id.
    #[serde(rename = "teamID")]
    pub team_id: Option<TeamId>,
    pub team: Option<ManagersTeam>,
    pub transfers: Vec<TransferRecord>,
    /// Resolved players for `team.picks`, in pick order.
    pub players: Vec<Element>,
    pub loaded_information: bool,
    pub player: Vec<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub name: String,
    pub message: String,
}

/// The one error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestError {
    pub error: ErrorDetail,
    pub message: String,
    /// Fatal errors cannot be dismissed.
    pub is_fatal: bool,
}

impl LatestError {
    pub fn new(error: ErrorDetail, message: &str, is_fatal: bool) -> Self {
        Self {
            error,
            message: message.to_string(),
            is_fatal,
        }
    }

    /// Wrap `err` with a user-facing `message`.
    pub fn from_error(err: &FplError, message: &str, is_fatal: bool) -> Self {
        Self::new(
            ErrorDetail {
                name: err.kind().to_string(),
                message: err.to_string(),
            },
            message,
            is_fatal,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// Inputs for predictions and transfer suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub model: Option<String>,
    pub horizon: u32,
    pub transfers: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            model: None,
            horizon: 1,
            transfers: 1,
        }
    }
}

impl Filters {
    pub const MAX_TRANSFERS: u32 = 5;

    /// Longest horizon available from `gameweek` to the end of the season.
    /// With no gameweek known the whole season is available.
    pub fn max_horizon(gameweek: Option<Gameweek>) -> u32 {
        let season = u32::from(FINAL_GAMEWEEK);
        gameweek.map_or(season, |g| {
            (season + 1).saturating_sub(u32::from(g.as_u16())).max(1)
        })
    }

    /// Build filters, checking `horizon` and `transfers` against their bounds.
    pub fn validated(
        model: Option<String>,
        horizon: u32,
        transfers: u32,
        gameweek: Option<Gameweek>,
    ) -> Result<Self> {
        let max_horizon = Self::max_horizon(gameweek);
        if !(1..=max_horizon).contains(&horizon) {
            return Err(FplError::InvalidFilters {
                reason: format!("horizon must be between 1 and {}, got {}", max_horizon, horizon),
            });
        }
        if !(1..=Self::MAX_TRANSFERS).contains(&transfers) {
            return Err(FplError::InvalidFilters {
                reason: format!(
                    "transfers must be between 1 and {}, got {}",
                    Self::MAX_TRANSFERS,
                    transfers
                ),
            });
        }
        Ok(Self {
            model,
            horizon,
            transfers,
        })
    }
}

/// The single source of truth. Only ever changed by applying an
/// [`Action`](crate::state::Action).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub theme: Theme,
    pub navbar_open: bool,
    pub current_page: Page,
    pub general_information: GeneralInformation,
    pub user: User,
    pub latest_error: Option<LatestError>,
    pub notifications: Vec<Notification>,
    pub gameweek_data: Option<GameweekData>,
    pub gameweek: Option<Gameweek>,
    pub filters: Filters,
    pub fixtures: Vec<Fixture>,
    pub is_loading: bool,
    pub loading_percent: f64,
    pub prediction_response: Option<PredictionResponse>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            navbar_open: false,
            current_page: Page::Landing,
            general_information: GeneralInformation::default(),
            user: User::default(),
            latest_error: None,
            notifications: Vec::new(),
            gameweek_data: None,
            gameweek: None,
            filters: Filters::default(),
            fixtures: Vec::new(),
            is_loading: false,
            loading_percent: 0.0,
            prediction_response: Some(PredictionResponse::default()),
        }
    }
}

impl State {
    pub fn has_fatal_error(&self) -> bool {
        self.latest_error.as_ref().is_some_and(|e| e.is_fatal)
    }
}
