//! Values computed from other parts of the state.

use chrono::{DateTime, Utc};

use crate::cli::types::Gameweek;
use crate::fpl::types::{Element, GeneralInformation, Pick};
use crate::{FplError, Result};

/// The first event, in listed order, whose deadline is strictly after `now`.
/// `None` once every deadline has passed.
pub fn derive_gameweek(info: &GeneralInformation, now: DateTime<Utc>) -> Option<Gameweek> {
    info.events
        .iter()
        .find(|event| event.deadline_time > now)
        .map(|event| event.id)
}

/// Look up each pick's player in `elements`, keeping pick order.
///
/// Every pick must resolve. A short result is a
/// [`FplError::DataConsistency`] rather than a truncated squad.
pub fn resolve_players(picks: &[Pick], elements: &[Element]) -> Result<Vec<Element>> {
    let players: Vec<Element> = picks
        .iter()
        .filter_map(|pick| elements.iter().find(|e| e.id == pick.element))
        .cloned()
        .collect();

    if players.len() != picks.len() {
        return Err(FplError::DataConsistency {
            expected: picks.len(),
            found: players.len(),
        });
    }
    Ok(players)
}
