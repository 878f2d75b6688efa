//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use fpl_assist::{
    cli::{Commands, FplAssist},
    commands::{
        fixtures::{handle_fixtures, FixturesParams},
        gameweek::handle_gameweek,
        predict::handle_predict,
        team::handle_team,
        transfers::{handle_transfers, TransfersParams},
    },
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = FplAssist::parse();
    init_tracing(app.verbose);

    match app.command {
        Commands::Gameweek { refresh, top, json } => handle_gameweek(refresh, top, json)
            .await
            .context("gameweek command failed")?,

        Commands::Fixtures {
            gameweek,
            horizon,
            team,
            difficulty,
            venue,
            summary,
            json,
        } => handle_fixtures(FixturesParams {
            gameweek,
            horizon,
            team,
            difficulty,
            venue,
            summary,
            as_json: json,
        })
        .await
        .context("fixtures command failed")?,

        Commands::Team { manager } => handle_team(manager.team_id, manager.refresh, manager.json)
            .await
            .context("team command failed")?,

        Commands::Transfers {
            manager,
            model,
            horizon,
            transfers,
        } => handle_transfers(TransfersParams {
            team_id: manager.team_id,
            model,
            horizon,
            transfers,
            refresh: manager.refresh,
            as_json: manager.json,
        })
        .await
        .context("transfers command failed")?,

        Commands::Predict {
            model,
            horizon,
            top,
            json,
        } => handle_predict(model, horizon, top, json)
            .await
            .context("predict command failed")?,
    }

    Ok(())
}
