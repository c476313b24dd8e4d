// ABOUTME: Core types and constants for the energy forecast pipeline
// ABOUTME: Foundation crate with error handling, forecast data model, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![deny(unsafe_code)]

//! # Forecast Core
//!
//! Foundation crate providing shared types and constants for the forecast
//! pipeline. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the wire error envelope
//! - **constants**: Cache TTLs, retry defaults, model defaults, and energy thresholds
//! - **models**: Energy profiles, guidance, predictive insights, daily and weekly forecasts

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Forecast data model shared by every pipeline stage
pub mod models;
