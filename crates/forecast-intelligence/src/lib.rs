// ABOUTME: Forecast intelligence - predictive analysis, cycle parsing, theme ranking, weekly synthesis
// ABOUTME: Pure in-process computation; nothing in this crate performs I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![deny(unsafe_code)]

//! # Forecast Intelligence
//!
//! CPU-bound stages of the forecast pipeline. Every function here is
//! deterministic for a given input so results are safe to cache.

pub use forecast_core::constants;
pub use forecast_core::errors;
pub use forecast_core::models;

/// Numeric engine payload parsing, energy banding and optimal timing
pub mod cycles;
/// Trend regression, critical periods and optimal actions
pub mod predictive_analyzer;
/// Least-squares regression
pub mod statistical_analysis;
/// Theme extraction and frequency ranking
pub mod themes;
/// Seven-day aggregation
pub mod weekly_synthesizer;

pub use cycles::{NumericReading, SeriesPoint};
pub use predictive_analyzer::PredictiveAnalyzer;
pub use statistical_analysis::{RegressionResult, StatisticalAnalyzer};
pub use themes::{extract_themes, rank_themes};
pub use weekly_synthesizer::{week_start_of, WeeklySynthesizer};
