//! Helpers shared across command implementations.

use serde::Serialize;

use crate::core::ClientConfig;
use crate::fpl::http::FplClient;
use crate::fpl::optimiser::OptimiserClient;
use crate::fpl::service::{DataService, OptimiserService};
use crate::fpl::types::{Element, GeneralInformation};
use crate::session::Session;
use crate::{FplError, Result};

pub type FplSession = Session<FplClient, OptimiserClient>;

/// Build a session from the environment and load general information,
/// fixtures and live data for the current gameweek.
pub async fn open_session(refresh: bool) -> Result<FplSession> {
    // tarpaulin::skip - HTTP/file I/O call, tested via integration tests
    let session = Session::from_config(&ClientConfig::from_env())?;
    session
        .bootstrap(refresh)
        .await
        .map_err(|e| explain_failure(&session, e))?;
    Ok(session)
}

/// Print the fatal error held by the session, if any, before `err` is
/// returned to `main`.
pub fn explain_failure<D, O>(session: &Session<D, O>, err: FplError) -> FplError
where
    D: DataService + ?Sized,
    O: OptimiserService + ?Sized,
{
    if let Some(fatal) = session.fatal_error() {
        eprintln!("{}", fatal.message); // tarpaulin::skip
    }
    err
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?); // tarpaulin::skip
    Ok(())
}

/// `£10.5m`
pub fn format_price(now_cost: i32) -> String {
    format!("£{:.1}m", f64::from(now_cost) / 10.0)
}

/// One line describing a player: name, club, position and price.
pub fn player_line(player: &Element, info: &GeneralInformation) -> String {
    let club = info
        .team(player.team)
        .map(|t| t.short_name.as_str())
        .unwrap_or("???");
    let position = info
        .element_type(player.element_type)
        .map(|t| t.singular_name_short.as_str())
        .unwrap_or("???");
    format!(
        "{:<20} {:<4} {:<4} {:>7} {:>4} pts",
        player.web_name,
        club,
        position,
        format_price(player.now_cost),
        player.total_points
    )
}
