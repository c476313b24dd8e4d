// ABOUTME: Main library entry point for the energy forecast service
// ABOUTME: Wires cache, engine client, model synthesis and orchestration behind an HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![deny(unsafe_code)]

//! # Energy Forecast
//!
//! Produces daily and weekly energy forecasts for a user by fanning out to
//! external calculation engines, scoring the numeric cycle data, and asking a
//! language model to synthesize the narrative readings into guidance.
//!
//! ## Architecture
//!
//! - **Cache**: TTL key-value store with in-memory and Redis backends
//! - **Engines**: cached, retried calls to the calculation engine service
//! - **Interpretation**: model cascade and section parsing of model output
//! - **Forecast**: per-day pipeline, weekly aggregation and batch fan-out
//! - **Routes**: axum handlers exposing the pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use energy_forecast::config::environment::ServerConfig;
//! use energy_forecast::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

pub use forecast_core::{constants, errors, models};

/// TTL cache store and typed cache keys
pub mod cache;

/// Environment-driven configuration
pub mod config;

/// Resilient calculation engine client
pub mod engines;

/// Forecast orchestration
pub mod forecast;

/// Model synthesis with fallback cascade
pub mod interpretation;

/// Chat-completion backend abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// User profile lookup
pub mod profiles;

/// HTTP routes
pub mod routes;
