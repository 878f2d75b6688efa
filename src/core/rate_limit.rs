//! Sliding-window admission control for outbound requests.
//!
//! A [`RateLimiter`] counts the requests it admitted during the trailing
//! `window`. When a request arrives and the window is already full, the
//! limiter rejects it and enters a cooldown during which every request is
//! rejected without bookkeeping. Once the cooldown has elapsed the window
//! starts empty again.
//!
//! Rejected requests are never queued or retried here; callers decide what a
//! rejection means for them. The limiter knows nothing about application
//! state.
//!
//! Clones share one budget, so build one limiter per upstream endpoint and
//! hand clones to every caller that talks to it.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::clock::{Clock, SystemClock};
use crate::error::{FplError, Result};


/// Limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    pub max_requests: u32,
    pub window: Duration,
    pub cooldown: Duration,
}

impl LimiterConfig {
    pub const DEFAULT_MAX_REQUESTS: u32 = 5;
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(5000);

    /// Build a config, rejecting zero values.
    pub fn new(max_requests: u32, window: Duration, cooldown: Duration) -> Result<Self> {
        if max_requests == 0 {
            return Err(FplError::InvalidConfig {
                reason: "max_requests must be positive".to_string(),
            });
        }
        if window.is_zero() || cooldown.is_zero() {
            return Err(FplError::InvalidConfig {
                reason: "window and cooldown must be positive".to_string(),
            });
        }
        Ok(Self {
            max_requests,
            window,
            cooldown,
        })
    }

    fn window_ms(&self) -> u64 {
        u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX)
    }

    fn cooldown_ms(&self) -> u64 {
        u64::try_from(self.cooldown.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: Self::DEFAULT_MAX_REQUESTS,
            window: Self::DEFAULT_WINDOW,
            cooldown: Self::DEFAULT_COOLDOWN,
        }
    }
}

/// Observable limiter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterState {
    Normal,
    Cooldown,
}

#[derive(Debug, Default)]
struct Window {
    admitted: VecDeque<u64>,
    cooldown_until: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    name: Arc<str>,
    config: LimiterConfig,
    clock: Arc<dyn Clock>,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    /// Limiter on real time.
    pub fn new(name: &str, config: LimiterConfig) -> Self {
        Self::with_clock(name, config, Arc::new(SystemClock::default()))
    }

    pub fn with_clock(name: &str, config: LimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: Arc::from(name),
            config,
            clock,
            window: Arc::new(Mutex::new(Window::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> LimiterConfig {
        self.config
    }

    /// Current mode. A cooldown whose deadline has passed reads as `Normal`.
    pub fn state(&self) -> LimiterState {
        let now = self.clock.now_millis();
        let window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        match window.cooldown_until {
            Some(until) if now < until => LimiterState::Cooldown,
            _ => LimiterState::Normal,
        }
    }

    /// Take one slot or fail with a rate-limit error.
    ///
    /// The whole decision happens under one lock, so two racing callers can
    /// never both take the last slot.
    pub fn try_acquire(&self) -> Result<()> {
        let now = self.clock.now_millis();
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(until) = window.cooldown_until {
            if now < until {
                warn!(limiter = %self.name, retry_after_ms = until - now, "rate limit exceeded - timed out");
                return Err(FplError::RateLimited {
                    retry_after_ms: until - now,
                });
            }
            debug!(limiter = %self.name, "cooldown elapsed, window reset");
            window.cooldown_until = None;
            window.admitted.clear();
        }

        let window_ms = self.config.window_ms();
        while let Some(&oldest) = window.admitted.front() {
            if now.saturating_sub(oldest) >= window_ms {
                window.admitted.pop_front();
            } else {
                break;
            }
        }

        if window.admitted.len() < self.config.max_requests as usize {
            window.admitted.push_back(now);
            return Ok(());
        }

        window.cooldown_until = Some(now.saturating_add(self.config.cooldown_ms()));
        warn!(
            limiter = %self.name,
            max_requests = self.config.max_requests,
            window_ms,
            cooldown_ms = self.config.cooldown_ms(),
            "window exhausted, entering cooldown"
        );
        Err(FplError::RateLimitExceeded {
            max_requests: self.config.max_requests,
            window_ms,
        })
    }

    /// Admit `request` and await it, or fail fast without calling it.
    ///
    /// Errors from the request itself are passed through untouched.
    pub async fn make_request<T, F, Fut>(&self, request: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.try_acquire()?;
        request().await
    }
}
