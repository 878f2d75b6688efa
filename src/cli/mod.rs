//! CLI argument definitions and parsing.

pub mod types;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};

use crate::fpl::fixtures::Venue;
use crate::fpl::optimiser::PREDICTION_MODELS;
use types::{Gameweek, TeamId};

/// Arguments shared by commands that act on one manager.
#[derive(Debug, Args)]
pub struct ManagerArgs {
    /// Manager (entry) id (or set `FPL_TEAM_ID` env var).
    #[clap(long, short)]
    pub team_id: Option<TeamId>,

    /// Re-download general information, overwriting the cache.
    #[clap(long)]
    pub refresh: bool,

    /// Output results as JSON instead of text lines.
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the current gameweek, its deadline and the top live scorers.
    Gameweek {
        /// Re-download general information, overwriting the cache.
        #[clap(long)]
        refresh: bool,

        /// How many live scorers to list.
        #[clap(long, default_value_t = 5)]
        top: usize,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// List upcoming fixtures, or summarise fixture difficulty per club.
    Fixtures {
        /// First gameweek to show (defaults to the current one).
        #[clap(long, short)]
        gameweek: Option<Gameweek>,

        /// Number of gameweeks after the first to include.
        #[clap(long, default_value_t = 5)]
        horizon: u16,

        /// Only fixtures involving this club id.
        #[clap(long)]
        team: Option<u32>,

        /// Only fixtures with this difficulty rating (1-5).
        #[clap(long, short, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: Option<u8>,

        /// Restrict `--team`/`--difficulty` to one side: home or away.
        #[clap(long)]
        venue: Option<Venue>,

        /// Print average difficulty per club instead of the fixture list.
        #[clap(long)]
        summary: bool,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Load a manager's squad for the previous gameweek.
    Team {
        #[clap(flatten)]
        manager: ManagerArgs,
    },

    /// Ask the optimiser for transfer suggestions for a manager.
    Transfers {
        #[clap(flatten)]
        manager: ManagerArgs,

        /// Prediction model the optimiser should use.
        #[clap(long, short, value_parser = PossibleValuesParser::new(PREDICTION_MODELS))]
        model: Option<String>,

        /// Gameweeks ahead to optimise for.
        #[clap(long, default_value_t = 1)]
        horizon: u32,

        /// Number of transfers to suggest (1-5).
        #[clap(long, default_value_t = 1)]
        transfers: u32,
    },

    /// Request point predictions from the optimiser backend.
    Predict {
        /// Prediction model.
        #[clap(long, short, value_parser = PossibleValuesParser::new(PREDICTION_MODELS))]
        model: String,

        /// Gameweeks ahead to predict.
        #[clap(long, default_value_t = 1)]
        horizon: u32,

        /// How many players to list.
        #[clap(long, default_value_t = 20)]
        top: usize,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "fpl-assist", about = "Fantasy Premier League assistant", version)]
pub struct FplAssist {
    /// Log debug output to stderr (`RUST_LOG` takes precedence).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
