//! Runtime configuration gathered from the environment.

use std::time::Duration;

use tracing::warn;

use crate::core::rate_limit::LimiterConfig;

/// Public FPL API root.
pub const FPL_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// Default root of the optimisation/prediction backend.
pub const OPTIMISER_BASE_URL: &str = "http://localhost:7071/api";

pub const FPL_API_BASE_URL_ENV_VAR: &str = "FPL_API_BASE_URL";
pub const OPTIMISER_URL_ENV_VAR: &str = "FPL_OPTIMISER_URL";
pub const MAX_REQUESTS_ENV_VAR: &str = "FPL_MAX_REQUESTS";
pub const WINDOW_MS_ENV_VAR: &str = "FPL_WINDOW_MS";
pub const COOLDOWN_MS_ENV_VAR: &str = "FPL_COOLDOWN_MS";

/// Where to send requests and how hard each endpoint may be hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub fpl_base_url: String,
    pub optimiser_base_url: String,
    pub fpl_limits: LimiterConfig,
    pub optimiser_limits: LimiterConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fpl_base_url: FPL_BASE_URL.to_string(),
            optimiser_base_url: OPTIMISER_BASE_URL.to_string(),
            fpl_limits: LimiterConfig::default(),
            optimiser_limits: LimiterConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by any `FPL_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(FPL_API_BASE_URL_ENV_VAR) {
            config.fpl_base_url = url;
        }
        if let Some(url) = lookup(OPTIMISER_URL_ENV_VAR) {
            config.optimiser_base_url = url;
        }

        let defaults = LimiterConfig::default();
        let max_requests = parse_positive(&lookup, MAX_REQUESTS_ENV_VAR)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(defaults.max_requests);
        let window = parse_positive(&lookup, WINDOW_MS_ENV_VAR)
            .map(Duration::from_millis)
            .unwrap_or(defaults.window);
        let cooldown = parse_positive(&lookup, COOLDOWN_MS_ENV_VAR)
            .map(Duration::from_millis)
            .unwrap_or(defaults.cooldown);

        let limits = LimiterConfig::new(max_requests, window, cooldown).unwrap_or(defaults);
        config.fpl_limits = limits;
        config.optimiser_limits = limits;
        config
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(variable = key, value = %raw, "ignoring invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.fpl_base_url, "https://fantasy.premierleague.com/api");
    }

    #[test]
    fn test_overrides_from_env() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (FPL_API_BASE_URL_ENV_VAR, "http://127.0.0.1:9000"),
            (OPTIMISER_URL_ENV_VAR, "http://127.0.0.1:9001/api"),
            (MAX_REQUESTS_ENV_VAR, "10"),
            (WINDOW_MS_ENV_VAR, "1000"),
            (COOLDOWN_MS_ENV_VAR, "250"),
        ]));

        assert_eq!(config.fpl_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.optimiser_base_url, "http://127.0.0.1:9001/api");
        assert_eq!(config.fpl_limits.max_requests, 10);
        assert_eq!(config.fpl_limits.window, Duration::from_millis(1000));
        assert_eq!(config.optimiser_limits.cooldown, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (MAX_REQUESTS_ENV_VAR, "0"),
            (WINDOW_MS_ENV_VAR, "soon"),
        ]));

        assert_eq!(config.fpl_limits, LimiterConfig::default());
    }
}
