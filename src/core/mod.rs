//! Core utilities for the FPL assistant
//!
//! - `clock`: time source abstraction
//! - `rate_limit`: sliding-window admission control
//! - `config`: environment-driven client configuration
//! - `cache`: file system and in-memory caching
//! - `http`: shared request helpers

pub mod cache;
pub mod clock;
pub mod config;
pub mod http;
pub mod rate_limit;

// Re-export commonly used items for convenience
pub use cache::{bootstrap_cache_path, try_read_to_string, write_string, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use rate_limit::{LimiterConfig, LimiterState, RateLimiter};
