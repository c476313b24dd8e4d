// ABOUTME: Forecast orchestration - request options, responses and the orchestrator
// ABOUTME: Daily, weekly and batch entry points exposed to HTTP handlers and schedulers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

/// Top-level coordinator for daily, weekly and batch forecasts
pub mod orchestrator;
/// Recommendation and template text
pub mod recommendations;

pub use orchestrator::{parse_forecast_date, ForecastOrchestrator};

use crate::models::{DailyForecast, EnergyLevel, WeeklyForecast};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    /// Return the compact launcher view
    pub raycast_optimized: bool,
    /// Read cached forecasts and engine results
    pub use_cache: bool,
    /// Overrides the configured request deadline
    pub deadline: Option<Duration>,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            raycast_optimized: false,
            use_cache: true,
            deadline: None,
        }
    }
}

/// Where the guidance synthesis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisSource {
    /// A language model
    Model,
    /// The deterministic template
    Template,
}

/// Engine call that produced no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineFailure {
    /// Engine name
    pub engine: String,
    /// Last error
    pub error: String,
    /// Attempts made
    pub attempts: u32,
    /// Whether the last error was transient
    pub transient: bool,
}

/// Observability metadata; carries no business meaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDiagnostics {
    /// Served from the daily cache
    pub cache_hit: bool,
    /// Engines that returned data
    pub engines_succeeded: Vec<String>,
    /// Engine results served from the engine cache
    pub engines_cached: Vec<String>,
    /// Engines that failed
    pub engines_failed: Vec<EngineFailure>,
    /// Model that wrote the synthesis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// Models tried, in order
    pub attempted_models: Vec<String>,
    /// Cascade switches
    pub model_switches: usize,
    /// Synthesis origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis_source: Option<SynthesisSource>,
    /// Interpretation confidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The request deadline cut work short
    pub deadline_exceeded: bool,
}

impl ForecastDiagnostics {
    /// Diagnostics for a cache hit
    #[must_use]
    pub fn cache_hit() -> Self {
        Self {
            cache_hit: true,
            engines_succeeded: Vec::new(),
            engines_cached: Vec::new(),
            engines_failed: Vec::new(),
            model_used: None,
            attempted_models: Vec::new(),
            model_switches: 0,
            synthesis_source: None,
            confidence: None,
            deadline_exceeded: false,
        }
    }
}

/// Daily forecast with its cache flag and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastResponse {
    /// The forecast, compact when requested
    pub forecast: DailyForecast,
    /// Served from cache
    pub cached: bool,
    /// Observability metadata
    pub diagnostics: ForecastDiagnostics,
}

/// Weekly forecast with its cache flag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyForecastResponse {
    /// The forecast
    pub forecast: WeeklyForecast,
    /// Whole week served from the weekly cache
    pub cached: bool,
    /// Days served from the daily cache
    pub daily_cache_hits: usize,
    /// Days replaced by a placeholder
    pub degraded_dates: Vec<NaiveDate>,
}

/// Which days a batch covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchSelection {
    /// Explicit ISO dates
    Dates {
        /// Dates as sent by the caller
        dates: Vec<String>,
    },
    /// A run of days starting today (UTC)
    Days {
        /// Number of days
        days: u32,
    },
}

/// Batch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Days to forecast
    #[serde(flatten)]
    pub selection: BatchSelection,
    /// Add the weekly forecast for the week of the first date
    #[serde(default)]
    pub include_weekly: bool,
    /// Read cached forecasts
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

const fn default_true() -> bool {
    true
}

/// A batch day that could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Day
    pub date: NaiveDate,
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

/// Count of days per energy level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyDistribution {
    /// High-energy days
    pub high: usize,
    /// Medium-energy days
    pub medium: usize,
    /// Low-energy days
    pub low: usize,
}

impl EnergyDistribution {
    /// Count one day
    pub fn record(&mut self, level: EnergyLevel) {
        match level {
            EnergyLevel::High => self.high += 1,
            EnergyLevel::Medium => self.medium += 1,
            EnergyLevel::Low => self.low += 1,
        }
    }
}

/// Batch outcome counts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Days requested
    pub total: usize,
    /// Days computed or served from cache
    pub succeeded: usize,
    /// Days that failed
    pub failed_dates: Vec<BatchFailure>,
    /// Days served from the daily cache
    pub cache_hits: usize,
    /// Energy levels across succeeded days
    pub energy_distribution: EnergyDistribution,
}

/// Batch result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchForecastResponse {
    /// Succeeded days, ascending
    pub daily_forecasts: Vec<DailyForecast>,
    /// Weekly forecast when requested and available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_forecast: Option<WeeklyForecast>,
    /// Counts
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_request_accepts_both_shapes() {
        let by_dates: BatchRequest =
            serde_json::from_value(json!({"dates": ["2024-06-10"], "include_weekly": true})).unwrap();
        assert_eq!(
            by_dates.selection,
            BatchSelection::Dates {
                dates: vec!["2024-06-10".to_owned()]
            }
        );
        assert!(by_dates.include_weekly);
        assert!(by_dates.use_cache);

        let by_days: BatchRequest = serde_json::from_value(json!({"days": 3})).unwrap();
        assert_eq!(by_days.selection, BatchSelection::Days { days: 3 });
        assert!(!by_days.include_weekly);
    }
}
