// ABOUTME: Cache-related constants for TTL, capacity, and cleanup intervals
// ABOUTME: Supports both in-memory and Redis cache backends with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Calculation engine result TTL (5 minutes)
pub const TTL_ENGINE_RESULT_SECS: u64 = 300;

/// Assembled daily forecast TTL (6 hours)
pub const TTL_DAILY_FORECAST_SECS: u64 = 21_600;

/// Assembled weekly forecast TTL (6 hours) - never outlives its days
pub const TTL_WEEKLY_FORECAST_SECS: u64 = 21_600;

/// Key namespace for daily forecasts
pub const NAMESPACE_DAILY: &str = "daily";

/// Key namespace for weekly forecasts
pub const NAMESPACE_WEEKLY: &str = "weekly";

/// Key namespace for calculation engine results
pub const NAMESPACE_ENGINE: &str = "engine";

/// Redis connection timeout in seconds
pub const REDIS_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Redis operation timeout in seconds
pub const REDIS_RESPONSE_TIMEOUT_SECS: u64 = 3;

/// Redis initial connection attempts at startup
pub const REDIS_INITIAL_CONNECTION_RETRIES: u32 = 3;

/// Redis initial retry delay in milliseconds
pub const REDIS_INITIAL_RETRY_DELAY_MS: u64 = 500;

/// Redis maximum retry delay in milliseconds
pub const REDIS_MAX_RETRY_DELAY_MS: u64 = 5_000;

/// Cache key prefix for namespacing shared Redis instances
pub const CACHE_KEY_PREFIX: &str = "energy-forecast:cache:";

/// Reconnection attempts after an established Redis connection drops
pub const REDIS_RECONNECTION_RETRIES: usize = 5;
