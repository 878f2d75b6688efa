//! Gameweek numbering.

use crate::error::{FplError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Last gameweek of a Premier League season.
pub const FINAL_GAMEWEEK: u16 = 38;

/// Type-safe wrapper for gameweek ("event") numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gameweek(pub u16);

impl Gameweek {
    pub fn new(gameweek: u16) -> Self {
        Self(gameweek)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// The gameweek before this one, never going below gameweek 1.
    pub fn previous(&self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }

    /// Shift by `delta` gameweeks, clamped to gameweek 1.
    pub fn offset(&self, delta: i32) -> Self {
        let shifted = i32::from(self.0)
            .saturating_add(delta)
            .clamp(1, i32::from(u16::MAX));
        Self(shifted as u16)
    }
}

impl fmt::Display for Gameweek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Gameweek {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_clamps_at_one() {
        assert_eq!(Gameweek::new(5).previous(), Gameweek::new(4));
        assert_eq!(Gameweek::new(1).previous(), Gameweek::new(1));
    }

    #[test]
    fn test_offset() {
        assert_eq!(Gameweek::new(5).offset(1), Gameweek::new(6));
        assert_eq!(Gameweek::new(5).offset(-2), Gameweek::new(3));
        assert_eq!(Gameweek::new(1).offset(-1), Gameweek::new(1));
    }

    #[test]
    fn test_offset_extreme_deltas() {
        assert_eq!(Gameweek::new(5).offset(i32::MAX), Gameweek::new(u16::MAX));
        assert_eq!(Gameweek::new(5).offset(i32::MIN), Gameweek::new(1));
    }
}
