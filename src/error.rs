//! Error types for the FPL assistant

use thiserror::Error;


pub type Result<T> = std::result::Result<T, FplError>;

#[derive(Error, Debug)]
pub enum FplError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status} ({url})")]
    Upstream { status: u16, url: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Rate limit exceeded. Maximum {max_requests} requests per {window_ms}ms allowed.")]
    RateLimitExceeded { max_requests: u32, window_ms: u64 },

    #[error("Rate limit exceeded - timed out for another {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Mismatch in player data: {expected} picks but {found} players resolved")]
    DataConsistency { expected: usize, found: usize },

    #[error("Team ID not provided and {env_var} environment variable not set")]
    MissingTeamId { env_var: String },

    #[error("Failed to parse id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Invalid filters: {reason}")]
    InvalidFilters { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid page: {value}")]
    InvalidPage { value: String },

    #[error("Invalid theme: {value}")]
    InvalidTheme { value: String },

    #[error("Invalid venue: {value} (expected home or away)")]
    InvalidVenue { value: String },

    #[error("No upcoming gameweek: every deadline has passed")]
    NoGameweek,

    #[error("{what} has not been loaded yet")]
    NotLoaded { what: String },

}

impl FplError {
    /// True for both ways the admission controller refuses a request.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            FplError::RateLimitExceeded { .. } | FplError::RateLimited { .. }
        )
    }

    /// True for transport failures and non-success HTTP responses.
    pub fn is_upstream(&self) -> bool {
        matches!(self, FplError::Http(_) | FplError::Upstream { .. })
    }

    /// Short stable name used as the `error.name` of a surfaced error.
    pub fn kind(&self) -> &'static str {
        match self {
            FplError::RateLimitExceeded { .. } | FplError::RateLimited { .. } => {
                "RateLimitExceeded"
            }
            FplError::Http(_) | FplError::Upstream { .. } => "UpstreamFetchFailure",
            FplError::DataConsistency { .. } => "DataConsistencyError",
            FplError::Json(_) => "JsonError",
            FplError::Io(_) => "IoError",
            FplError::InvalidFilters { .. } => "InvalidFilters",
            FplError::NoGameweek | FplError::NotLoaded { .. } => "NotLoaded",
            FplError::InvalidHeader(_)
            | FplError::MissingTeamId { .. }
            | FplError::InvalidId(_)
            | FplError::InvalidConfig { .. }
            | FplError::InvalidPage { .. }
            | FplError::InvalidTheme { .. }
            | FplError::InvalidVenue { .. } => "InvalidInput",
        }
    }
}
