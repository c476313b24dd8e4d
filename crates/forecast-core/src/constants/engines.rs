// ABOUTME: Calculation engine defaults for names, retry policy, and timeouts
// ABOUTME: Values match the resilient engine client contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

/// Numeric-cycle engine
pub const DEFAULT_NUMERIC_ENGINE: &str = "biorhythm";

/// First narrative engine
pub const DEFAULT_PRIMARY_NARRATIVE_ENGINE: &str = "iching";

/// Second narrative engine
pub const DEFAULT_SECONDARY_NARRATIVE_ENGINE: &str = "tarot";

/// Days of cycle data requested from the numeric engine
pub const NUMERIC_FORECAST_DAYS: u32 = 7;

/// Attempts per engine call, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

/// Growth factor applied to each subsequent delay
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Bound on a single engine attempt
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 30;

/// Connection timeout for the engine service
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default engine service base URL
pub const DEFAULT_ENGINE_SERVICE_URL: &str = "http://localhost:8000/api/v1";
