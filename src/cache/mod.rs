// ABOUTME: Cache abstraction layer for engine results and assembled forecasts
// ABOUTME: Pluggable backend support (in-memory, Redis) behind one provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Every cached value in the pipeline is a derived, deterministic output, so
//! the cache is advisory: concurrent writers may race on a key and the last
//! write wins. Callers go through [`Cache`], whose `lookup`/`store` never
//! surface backend errors.

/// Cache facade selecting the backend at startup
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

pub use factory::Cache;

use crate::config::cache::{CacheTtlConfig, RedisConnectionConfig};
use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, NAMESPACE_DAILY, NAMESPACE_ENGINE,
    NAMESPACE_WEEKLY,
};
use crate::errors::AppResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache; expired entries read as absent
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the value does not deserialize
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove all entries whose key matches a glob pattern (e.g. `daily:u1:*`)
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the backend fails
    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    async fn health_check(&self) -> AppResult<()>;

    /// Clear all cache entries (administrative)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Process-local store
    #[default]
    Memory,
    /// Shared Redis instance
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Backend to construct
    pub backend: CacheBackend,
    /// Maximum number of entries (in-memory backend)
    pub max_entries: usize,
    /// Redis connection URL (Redis backend)
    pub redis_url: Option<String>,
    /// Sweep interval for expired entries
    pub cleanup_interval: Duration,
    /// Run the background sweep (disable in tests)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
    /// TTLs per namespace
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
            ttl: CacheTtlConfig::default(),
        }
    }
}

/// Namespaced cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Assembled daily forecast, `daily:{userId}:{date}`
    DailyForecast {
        /// Authenticated user id
        user_id: String,
        /// Forecast date
        date: NaiveDate,
    },
    /// Assembled weekly forecast, `weekly:{userId}:{weekStart}`
    WeeklyForecast {
        /// Authenticated user id
        user_id: String,
        /// Monday of the week
        week_start: NaiveDate,
    },
    /// Raw engine output, `engine:{engineName}:{inputHash}`
    EngineResult {
        /// Engine name
        engine: String,
        /// Hash of the normalized input
        input_hash: String,
    },
}

impl CacheKey {
    /// Key for a daily forecast
    #[must_use]
    pub fn daily(user_id: &str, date: NaiveDate) -> Self {
        Self::DailyForecast {
            user_id: user_id.to_owned(),
            date,
        }
    }

    /// Key for a weekly forecast
    #[must_use]
    pub fn weekly(user_id: &str, week_start: NaiveDate) -> Self {
        Self::WeeklyForecast {
            user_id: user_id.to_owned(),
            week_start,
        }
    }

    /// Key for an engine result
    #[must_use]
    pub fn engine(engine: &str, input_hash: impl Into<String>) -> Self {
        Self::EngineResult {
            engine: engine.to_owned(),
            input_hash: input_hash.into(),
        }
    }

    /// TTL configured for this key's namespace
    #[must_use]
    pub const fn ttl(&self, config: &CacheTtlConfig) -> Duration {
        match self {
            Self::DailyForecast { .. } => Duration::from_secs(config.daily_forecast_secs),
            Self::WeeklyForecast { .. } => Duration::from_secs(config.weekly_forecast_secs),
            Self::EngineResult { .. } => Duration::from_secs(config.engine_result_secs),
        }
    }

    /// Pattern matching every daily forecast cached for a user
    #[must_use]
    pub fn daily_pattern(user_id: &str) -> String {
        format!("{NAMESPACE_DAILY}:{}:*", glob::Pattern::escape(user_id))
    }

    /// Pattern matching every weekly forecast cached for a user
    #[must_use]
    pub fn weekly_pattern(user_id: &str) -> String {
        format!("{NAMESPACE_WEEKLY}:{}:*", glob::Pattern::escape(user_id))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyForecast { user_id, date } => {
                write!(f, "{NAMESPACE_DAILY}:{user_id}:{date}")
            }
            Self::WeeklyForecast {
                user_id,
                week_start,
            } => write!(f, "{NAMESPACE_WEEKLY}:{user_id}:{week_start}"),
            Self::EngineResult { engine, input_hash } => {
                write!(f, "{NAMESPACE_ENGINE}:{engine}:{input_hash}")
            }
        }
    }
}
