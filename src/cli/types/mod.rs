//! Type-safe wrappers for FPL identifiers.

pub mod ids;
pub mod time;

pub use ids::{PlayerId, TeamId};
pub use time::Gameweek;
