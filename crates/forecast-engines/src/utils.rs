// ABOUTME: Retry with exponential backoff and a per-attempt time bound
// ABOUTME: Transient engine failures are retried; permanent ones return at once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::engines::{
    DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_BASE_DELAY_MS,
    DEFAULT_MAX_ATTEMPTS,
};
use crate::engine_error::EngineError;
use std::env;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable for the maximum number of attempts
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "ENGINE_RETRY_MAX_ATTEMPTS";
/// Environment variable for the delay before the first retry
pub const ENV_RETRY_BASE_DELAY_MS: &str = "ENGINE_RETRY_BASE_DELAY_MS";
/// Environment variable for the backoff multiplier
pub const ENV_RETRY_BACKOFF_MULTIPLIER: &str = "ENGINE_RETRY_BACKOFF_MULTIPLIER";
/// Environment variable for the per-attempt timeout
pub const ENV_RETRY_ATTEMPT_TIMEOUT_SECS: &str = "ENGINE_ATTEMPT_TIMEOUT_SECS";

/// Backoff policy for engine calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryBackoffConfig {
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Growth factor applied per further attempt
    pub backoff_multiplier: f64,
    /// Bound on a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryBackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
        }
    }
}

impl RetryBackoffConfig {
    /// Load from environment, falling back to defaults for missing or invalid values
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_attempts: u32 = env_or(ENV_RETRY_MAX_ATTEMPTS, defaults.max_attempts);
        let multiplier: f64 = env_or(ENV_RETRY_BACKOFF_MULTIPLIER, defaults.backoff_multiplier);
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(env_or(
                ENV_RETRY_BASE_DELAY_MS,
                DEFAULT_BASE_DELAY_MS,
            )),
            backoff_multiplier: if multiplier.is_finite() && multiplier >= 1.0 {
                multiplier
            } else {
                defaults.backoff_multiplier
            },
            attempt_timeout: Duration::from_secs(env_or(
                ENV_RETRY_ATTEMPT_TIMEOUT_SECS,
                DEFAULT_ATTEMPT_TIMEOUT_SECS,
            )),
        }
    }

    /// Delay to wait before `attempt` (1-based); zero for the first attempt
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid retry setting, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Result of a retried operation with the number of attempts it took
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result
    pub result: Result<T, EngineError>,
    /// Attempts made (at least 1)
    pub attempts: u32,
}

/// Run `attempt_fn` until it succeeds, fails permanently, or attempts run out
///
/// Each attempt is bounded by `config.attempt_timeout`; an attempt that
/// exceeds it counts as a transient `Timeout` for `engine`.
pub async fn with_retry<T, F, Fut>(
    config: &RetryBackoffConfig,
    engine: &str,
    mut attempt_fn: F,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(config.attempt_timeout, attempt_fn(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::timeout(engine, config.attempt_timeout)),
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    debug!(engine, attempt, "Engine call succeeded after retry");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(error) if error.is_transient() && attempt < max_attempts => {
                let delay = config.delay_before(attempt + 1);
                warn!(
                    engine,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient engine failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(engine, attempt, transient = error.is_transient(), error = %error, "Engine call failed");
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                };
            }
        }
    }
}
