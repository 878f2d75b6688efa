//! Fantasy Premier League Assistant Library
//!
//! The core of an FPL dashboard: a rate-limited client for the public FPL
//! API and an optimiser backend, a single application state store driven by
//! a closed catalog of actions, and the manager data chain that loads picks,
//! transfers and resolved players for the current gameweek.
//!
//! ## Features
//!
//! - **Admission control**: a sliding-window rate limiter with cooldown, one
//!   shared instance per upstream
//! - **State store**: total, single-field transitions with the current
//!   gameweek derived from event deadlines
//! - **Manager pipeline**: picks, then transfers, then players, with stale
//!   results discarded
//! - **Fixture analysis**: filtering and per-club difficulty summaries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fpl_assist::{core::ClientConfig, session::Session, TeamId};
//!
//! # async fn example() -> fpl_assist::Result<()> {
//! let session = Session::from_config(&ClientConfig::from_env())?;
//! session.bootstrap(false).await?;
//! session.load_manager(TeamId::new(123456)).await?;
//!
//! let players = session.store().select(|s| s.user.players.len());
//! println!("{} players loaded", players);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set your FPL team id to avoid passing it in every command:
//! ```bash
//! export FPL_TEAM_ID=123456
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod fpl;
pub mod pipeline;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use cli::types::{Gameweek, PlayerId, TeamId};
pub use core::{LimiterConfig, RateLimiter};
pub use error::{FplError, Result};
pub use state::{Action, State, Store};

pub const TEAM_ID_ENV_VAR: &str = "FPL_TEAM_ID";
