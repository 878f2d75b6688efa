//! The closed catalog of state transitions and the reducer that applies them.

use serde::{Deserialize, Serialize};

use super::model::{Filters, LatestError, Notification, Page, State, Theme, User};
use crate::cli::types::Gameweek;
use crate::fpl::types::{Fixture, GameweekData, GeneralInformation, PredictionResponse};

/// One named transition. Each variant carries the full new value for exactly
/// one top-level field of [`State`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    SetTheme {
        theme: Theme,
    },
    SetNavbarOpen {
        #[serde(rename = "navbarOpen")]
        navbar_open: bool,
    },
    SetCurrentPage {
        #[serde(rename = "currentPage")]
        current_page: Page,
    },
    SetGeneralInformation {
        #[serde(rename = "generalInformation")]
        general_information: Box<GeneralInformation>,
    },
    SetUser {
        user: Box<User>,
    },
    SetLatestError {
        /// A missing payload clears the error.
        #[serde(rename = "latestError", default)]
        latest_error: Option<LatestError>,
    },
    SetNotifications {
        notifications: Vec<Notification>,
    },
    SetGameweekData {
        #[serde(rename = "gameweekData", default)]
        gameweek_data: Option<GameweekData>,
    },
    SetGameweek {
        #[serde(default)]
        gameweek: Option<Gameweek>,
    },
    SetFilters {
        filters: Filters,
    },
    SetFixtures {
        fixtures: Vec<Fixture>,
    },
    SetIsLoading {
        #[serde(rename = "isLoading")]
        is_loading: bool,
    },
    SetLoadingPercent {
        #[serde(rename = "loadingPercent")]
        loading_percent: f64,
    },
    SetPredictionResponse {
        #[serde(rename = "predictionResponse", default)]
        prediction_response: Option<PredictionResponse>,
    },
    /// Any `type` outside the catalog. Applying it changes nothing.
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetTheme { .. } => "SetTheme",
            Action::SetNavbarOpen { .. } => "SetNavbarOpen",
            Action::SetCurrentPage { .. } => "SetCurrentPage",
            Action::SetGeneralInformation { .. } => "SetGeneralInformation",
            Action::SetUser { .. } => "SetUser",
            Action::SetLatestError { .. } => "SetLatestError",
            Action::SetNotifications { .. } => "SetNotifications",
            Action::SetGameweekData { .. } => "SetGameweekData",
            Action::SetGameweek { .. } => "SetGameweek",
            Action::SetFilters { .. } => "SetFilters",
            Action::SetFixtures { .. } => "SetFixtures",
            Action::SetIsLoading { .. } => "SetIsLoading",
            Action::SetLoadingPercent { .. } => "SetLoadingPercent",
            Action::SetPredictionResponse { .. } => "SetPredictionResponse",
            Action::Unknown => "Unknown",
        }
    }

    pub fn set_user(user: User) -> Self {
        Action::SetUser {
            user: Box::new(user),
        }
    }

    pub fn set_general_information(info: GeneralInformation) -> Self {
        Action::SetGeneralInformation {
            general_information: Box::new(info),
        }
    }

    pub fn set_latest_error(error: Option<LatestError>) -> Self {
        Action::SetLatestError {
            latest_error: error,
        }
    }
}

impl State {
    /// Replace the one field named by `action`. Never fails.
    pub fn apply(mut self, action: Action) -> State {
        match action {
            Action::SetTheme { theme } => self.theme = theme,
            Action::SetNavbarOpen { navbar_open } => self.navbar_open = navbar_open,
            Action::SetCurrentPage { current_page } => self.current_page = current_page,
            Action::SetGeneralInformation {
                general_information,
            } => self.general_information = *general_information,
            Action::SetUser { user } => self.user = *user,
            Action::SetLatestError { latest_error } => self.latest_error = latest_error,
            Action::SetNotifications { notifications } => self.notifications = notifications,
            Action::SetGameweekData { gameweek_data } => self.gameweek_data = gameweek_data,
            Action::SetGameweek { gameweek } => self.gameweek = gameweek,
            Action::SetFilters { filters } => self.filters = filters,
            Action::SetFixtures { fixtures } => self.fixtures = fixtures,
            Action::SetIsLoading { is_loading } => self.is_loading = is_loading,
            Action::SetLoadingPercent { loading_percent } => {
                self.loading_percent = loading_percent
            }
            Action::SetPredictionResponse {
                prediction_response,
            } => self.prediction_response = prediction_response,
            Action::Unknown => {}
        }
        self
    }
}

/// Pure reducer: `state` is left untouched and the next state is returned.
pub fn reduce(state: &State, action: Action) -> State {
    state.clone().apply(action)
}

#[cfg(test)]
mod tests;
