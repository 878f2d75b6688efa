//! Application state: the root document, its transition catalog, derived
//! values and the store that ties them together.

pub mod action;
pub mod derive;
pub mod model;
pub mod store;

pub use action::{reduce, Action};
pub use derive::{derive_gameweek, resolve_players};
pub use model::{ErrorDetail, Filters, LatestError, Notification, Page, State, Theme, User};
pub use store::{Listener, Store, SubscriptionId};
