// ABOUTME: Predictive insight types - trend analysis, critical periods, optimal actions
// ABOUTME: Produced by the predictive analyzer from the numeric cycle series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of the regression trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Positive slope beyond threshold
    Improving,
    /// Negative slope beyond threshold
    Declining,
    /// Flat or too little data
    Stable,
}

/// Regression summary over the leading window of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    /// Banded direction
    pub direction: TrendDirection,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Window label, e.g. "7 days"
    pub timeframe: String,
    /// Least-squares slope per day
    pub slope: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

/// Kind of critical period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalPeriodType {
    /// Unusually high energy
    Opportunity,
    /// Unusually low energy
    Challenge,
    /// Sharp change or cycle crossing
    Transition,
}

/// A flagged date in the series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPeriod {
    /// Flagged date
    pub date: NaiveDate,
    /// Kind of period
    #[serde(rename = "type")]
    pub period_type: CriticalPeriodType,
    /// Human-readable explanation
    pub description: String,
}

/// A recommended action with its timing window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalAction {
    /// When to act
    pub timing: String,
    /// What to do
    pub action: String,
    /// Why
    pub reasoning: String,
}

/// Predictive section of a daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveInsights {
    /// Trend over the leading window
    pub trend_analysis: TrendAnalysis,
    /// Flagged dates, ascending
    pub critical_periods: Vec<CriticalPeriod>,
    /// Actions in evaluation order, at most six
    pub optimal_actions: Vec<OptimalAction>,
}
