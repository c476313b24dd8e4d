// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by pipeline stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, key namespaces)
pub mod cache;
/// Energy banding and predictive analysis thresholds
pub mod energy;
/// Calculation engine defaults (names, retry policy, timeouts)
pub mod engines;
/// Language-model cascade defaults
pub mod llm;

/// Service identity used in structured logs
pub mod service_names {
    /// Forecast server service name
    pub const ENERGY_FORECAST_SERVER: &str = "energy-forecast-server";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// API routes
pub mod routes {
    /// Health route
    pub const HEALTH: &str = "/health";
    /// Daily forecast route
    pub const DAILY_FORECAST: &str = "/api/forecast/daily/:date";
    /// Weekly forecast route
    pub const WEEKLY_FORECAST: &str = "/api/forecast/weekly/:week_start";
    /// Batch forecast route
    pub const BATCH_FORECAST: &str = "/api/forecast/batch";
    /// Cached forecasts of the calling user
    pub const FORECAST_CACHE: &str = "/api/forecast/cache";
    /// Header carrying the authenticated user id
    pub const USER_ID_HEADER: &str = "x-user-id";
    /// Header carrying the request correlation id
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
}

/// Forecast assembly limits
pub mod limits {
    /// Maximum recommendations on a daily forecast
    pub const MAX_RECOMMENDATIONS: usize = 6;
    /// Maximum key themes on daily guidance and weekly dominant themes
    pub const MAX_KEY_THEMES: usize = 5;
    /// Days in a weekly forecast
    pub const DAYS_PER_WEEK: usize = 7;
    /// Maximum days accepted by a batch request
    pub const MAX_BATCH_DAYS: usize = 31;
    /// Compact synthesis length for integration adapters
    pub const RAYCAST_SYNTHESIS_CHARS: usize = 280;
    /// Compact recommendation count for integration adapters
    pub const RAYCAST_RECOMMENDATIONS: usize = 3;
    /// Compact theme count for integration adapters
    pub const RAYCAST_THEMES: usize = 3;
    /// Default whole-request deadline in seconds
    pub const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 90;
}
