// ABOUTME: Forecast data model shared by every pipeline stage
// ABOUTME: Energy profiles, guidance, predictive insights, daily/weekly forecasts, profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Wire-facing types serialize in camelCase; engine payloads stay opaque
//! `serde_json::Value` blobs until a pipeline stage interprets them.

/// Energy levels, trends, cycle values and the per-day energy profile
pub mod energy;
/// Daily and weekly forecast aggregates
pub mod forecast;
/// Narrative guidance and symbolic readings
pub mod guidance;
/// Predictive trend analysis, critical periods and optimal actions
pub mod insights;
/// User birth data and preferences
pub mod profile;

pub use energy::{CycleValues, EnergyLevel, EnergyProfile, EnergyTrend, OptimalTiming};
pub use forecast::{DailyForecast, WeeklyForecast, WeeklyInsights};
pub use guidance::{ForecastGuidance, SymbolicReading};
pub use insights::{
    CriticalPeriod, CriticalPeriodType, OptimalAction, PredictiveInsights, TrendAnalysis,
    TrendDirection,
};
pub use profile::{BirthLocation, ForecastPreferences, UserProfile};
