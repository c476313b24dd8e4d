// ABOUTME: Cache configuration types for backend selection, Redis tuning and TTLs
// ABOUTME: Handles Redis connections and per-namespace expiry for engine and forecast entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::{env_parse_or, env_var_or};
use crate::cache::{CacheBackend, CacheConfig};
use crate::constants::cache;
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

impl CacheConfig {
    /// Load cache configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `CACHE_BACKEND` is unknown or the Redis backend is
    /// selected without `REDIS_URL`
    pub fn from_env() -> AppResult<Self> {
        let backend = match env_var_or("CACHE_BACKEND", "memory").to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => CacheBackend::Memory,
            "redis" => CacheBackend::Redis,
            other => {
                return Err(AppError::new(
                    ErrorCode::ConfigInvalid,
                    format!("Unknown CACHE_BACKEND '{other}' (expected 'memory' or 'redis')"),
                ))
            }
        };
        let redis_url = env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty());
        if backend == CacheBackend::Redis && redis_url.is_none() {
            return Err(AppError::new(
                ErrorCode::ConfigMissing,
                "REDIS_URL is required when CACHE_BACKEND=redis",
            ));
        }

        Ok(Self {
            backend,
            max_entries: env_parse_or("CACHE_MAX_ENTRIES", cache::DEFAULT_CACHE_MAX_ENTRIES),
            redis_url,
            cleanup_interval: Duration::from_secs(env_parse_or(
                "CACHE_CLEANUP_INTERVAL_SECS",
                cache::DEFAULT_CLEANUP_INTERVAL_SECS,
            )),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::from_env(),
            ttl: CacheTtlConfig::from_env(),
        })
    }
}

/// Cache TTL configuration per namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// Raw engine output (default: 5 minutes)
    pub engine_result_secs: u64,
    /// Assembled daily forecast (default: 6 hours)
    pub daily_forecast_secs: u64,
    /// Assembled weekly forecast (default: 6 hours)
    pub weekly_forecast_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            engine_result_secs: cache::TTL_ENGINE_RESULT_SECS,
            daily_forecast_secs: cache::TTL_DAILY_FORECAST_SECS,
            weekly_forecast_secs: cache::TTL_WEEKLY_FORECAST_SECS,
        }
    }
}

impl CacheTtlConfig {
    /// Load cache TTL configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            engine_result_secs: env_parse_or("ENGINE_CACHE_TTL_SECS", cache::TTL_ENGINE_RESULT_SECS),
            daily_forecast_secs: env_parse_or(
                "FORECAST_DAILY_TTL_SECS",
                cache::TTL_DAILY_FORECAST_SECS,
            ),
            weekly_forecast_secs: env_parse_or(
                "FORECAST_WEEKLY_TTL_SECS",
                cache::TTL_WEEKLY_FORECAST_SECS,
            ),
        }
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: cache::REDIS_CONNECT_TIMEOUT_SECS,
            response_timeout_secs: cache::REDIS_RESPONSE_TIMEOUT_SECS,
            reconnection_retries: cache::REDIS_RECONNECTION_RETRIES,
            max_retry_delay_ms: cache::REDIS_MAX_RETRY_DELAY_MS,
            initial_connection_retries: cache::REDIS_INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: cache::REDIS_INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            connection_timeout_secs: env_parse_or(
                "REDIS_CONNECTION_TIMEOUT_SECS",
                cache::REDIS_CONNECT_TIMEOUT_SECS,
            ),
            response_timeout_secs: env_parse_or(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                cache::REDIS_RESPONSE_TIMEOUT_SECS,
            ),
            reconnection_retries: env_parse_or(
                "REDIS_RECONNECTION_RETRIES",
                cache::REDIS_RECONNECTION_RETRIES,
            ),
            max_retry_delay_ms: env_parse_or(
                "REDIS_MAX_RETRY_DELAY_MS",
                cache::REDIS_MAX_RETRY_DELAY_MS,
            ),
            initial_connection_retries: env_parse_or(
                "REDIS_INITIAL_CONNECTION_RETRIES",
                cache::REDIS_INITIAL_CONNECTION_RETRIES,
            ),
            initial_retry_delay_ms: env_parse_or(
                "REDIS_INITIAL_RETRY_DELAY_MS",
                cache::REDIS_INITIAL_RETRY_DELAY_MS,
            ),
        }
    }
}
