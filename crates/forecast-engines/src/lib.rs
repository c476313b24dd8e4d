// ABOUTME: Calculation engine service client for the energy forecast pipeline
// ABOUTME: Service interface, HTTP transport, typed failure classification, and retry policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Calculation engines are pure remote functions: structured input in,
//! structured numeric or symbolic output back. This crate knows how to reach
//! them and how to tell a transient failure from a permanent one; caching
//! lives one layer up.

// Re-export forecast-core modules so engine code can keep `use crate::errors::*`
pub use forecast_core::constants;
pub use forecast_core::errors;

/// Typed engine failure classification
pub mod engine_error;
/// HTTP transport for the calculation engine service
pub mod http_client;
/// Service Provider Interface for calculation engine services
pub mod spi;
/// Retry with exponential backoff and per-attempt timeouts
pub mod utils;

pub use engine_error::EngineError;
pub use http_client::{EngineServiceConfig, HttpEngineService};
pub use spi::{CalculationEngineService, EngineEnvelope};
pub use utils::{
    with_retry, RetryBackoffConfig, RetryOutcome, ENV_RETRY_ATTEMPT_TIMEOUT_SECS,
    ENV_RETRY_BACKOFF_MULTIPLIER, ENV_RETRY_BASE_DELAY_MS, ENV_RETRY_MAX_ATTEMPTS,
};
