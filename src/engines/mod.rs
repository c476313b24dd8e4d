// ABOUTME: Calculation engine access for the forecast pipeline
// ABOUTME: Re-exports the engine service SPI and adds the cached, retrying client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

/// Cache-aside, retrying engine client
pub mod resilient;

pub use forecast_engines::{
    CalculationEngineService, EngineEnvelope, EngineError, EngineServiceConfig,
    HttpEngineService, RetryBackoffConfig,
};
pub use resilient::{canonical_json, input_hash, EngineOutcome, ResilientEngineClient};
