//! Fixture filtering and difficulty summaries for the fixtures view.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::Serialize;

use crate::cli::types::Gameweek;
use crate::fpl::types::{Fixture, Team};
use crate::{FplError, Result};

/// Which side of a fixture to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "home"),
            Venue::Away => write!(f, "away"),
        }
    }
}

impl FromStr for Venue {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "h" => Ok(Venue::Home),
            "away" | "a" => Ok(Venue::Away),
            other => Err(FplError::InvalidVenue {
                value: other.to_string(),
            }),
        }
    }
}

/// How hard a fixture difficulty rating (1-5) reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyBand {
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyBand::Easy => write!(f, "easy"),
            DifficultyBand::Moderate => write!(f, "moderate"),
            DifficultyBand::Hard => write!(f, "hard"),
            DifficultyBand::VeryHard => write!(f, "very hard"),
        }
    }
}

pub fn difficulty_band(difficulty: u8) -> DifficultyBand {
    match difficulty {
        0..=2 => DifficultyBand::Easy,
        3 => DifficultyBand::Moderate,
        4 => DifficultyBand::Hard,
        _ => DifficultyBand::VeryHard,
    }
}

/// Filters applied to the fixture list. Unset fields don't filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureQuery {
    /// Only fixtures in `[from_gameweek, from_gameweek + horizon]`.
    pub from_gameweek: Option<Gameweek>,
    pub horizon: u16,
    pub team: Option<u32>,
    pub difficulty: Option<u8>,
    pub venue: Option<Venue>,
}

impl FixtureQuery {
    pub fn matches(&self, fixture: &Fixture) -> bool {
        if let Some(from) = self.from_gameweek {
            let last = from.as_u16().saturating_add(self.horizon);
            match fixture.event {
                Some(gw) if gw >= from && gw.as_u16() <= last => {}
                _ => return false,
            }
        }

        if let Some(difficulty) = self.difficulty {
            let hit = match self.venue {
                Some(Venue::Home) => fixture.team_h_difficulty == difficulty,
                Some(Venue::Away) => fixture.team_a_difficulty == difficulty,
                None => {
                    fixture.team_h_difficulty == difficulty
                        || fixture.team_a_difficulty == difficulty
                }
            };
            if !hit {
                return false;
            }
        }

        if let Some(team) = self.team {
            let hit = match self.venue {
                Some(Venue::Home) => fixture.team_h == team,
                Some(Venue::Away) => fixture.team_a == team,
                None => fixture.involves(team),
            };
            if !hit {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, fixtures: &'a [Fixture]) -> Vec<&'a Fixture> {
        fixtures.iter().filter(|f| self.matches(f)).collect()
    }
}

/// Fixture load for one club over a run of gameweeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDifficulty {
    pub team: u32,
    pub short_name: String,
    pub fixtures: usize,
    pub average_difficulty: f64,
}

/// Average difficulty each club faces in `[from, from + horizon]`, easiest
/// run first. Clubs without a fixture in the range are left out.
pub fn team_difficulty_summary(
    fixtures: &[Fixture],
    teams: &[Team],
    from: Gameweek,
    horizon: u16,
) -> Vec<TeamDifficulty> {
    let window = FixtureQuery {
        from_gameweek: Some(from),
        horizon,
        ..FixtureQuery::default()
    };
    let in_range = window.apply(fixtures);

    let mut summary: Vec<TeamDifficulty> = teams
        .par_iter()
        .filter_map(|team| {
            let ratings: Vec<u8> = in_range
                .iter()
                .filter_map(|f| f.difficulty_for(team.id))
                .collect();
            if ratings.is_empty() {
                return None;
            }
            let total: u32 = ratings.iter().map(|&d| u32::from(d)).sum();
            Some(TeamDifficulty {
                team: team.id,
                short_name: team.short_name.clone(),
                fixtures: ratings.len(),
                average_difficulty: f64::from(total) / ratings.len() as f64,
            })
        })
        .collect();

    summary.sort_by(|a, b| {
        a.average_difficulty
            .total_cmp(&b.average_difficulty)
            .then_with(|| a.team.cmp(&b.team))
    });
    summary
}
