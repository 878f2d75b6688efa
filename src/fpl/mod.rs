//! FPL API integration: wire types, the service seam, HTTP clients and
//! fixture analysis.

pub mod bootstrap;
pub mod fixtures;
pub mod http;
pub mod optimiser;
pub mod service;
pub mod types;

pub use fixtures::{FixtureQuery, Venue};
pub use http::FplClient;
pub use optimiser::{OptimiserClient, PREDICTION_MODELS};
pub use service::{DataService, OptimiserService, TransferQuery};
