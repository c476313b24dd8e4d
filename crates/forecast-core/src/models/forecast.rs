// ABOUTME: Daily and weekly forecast aggregates as exposed to callers and cached
// ABOUTME: Daily forecasts are immutable once cached; weekly forecasts hold exactly seven days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::energy::EnergyProfile;
use super::guidance::ForecastGuidance;
use super::insights::PredictiveInsights;
use crate::constants::limits::{
    MAX_RECOMMENDATIONS, RAYCAST_RECOMMENDATIONS, RAYCAST_SYNTHESIS_CHARS, RAYCAST_THEMES,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast for one user and one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// Forecast date
    pub date: NaiveDate,
    /// Energy summary
    pub energy_profile: EnergyProfile,
    /// Narrative guidance
    pub guidance: ForecastGuidance,
    /// At most six recommendations
    pub recommendations: Vec<String>,
    /// Present when numeric cycle data was available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictive_insights: Option<PredictiveInsights>,
    /// Placeholder standing in for a day that could not be computed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl DailyForecast {
    /// Assemble a forecast, capping recommendations
    #[must_use]
    pub fn new(
        date: NaiveDate,
        energy_profile: EnergyProfile,
        guidance: ForecastGuidance,
        mut recommendations: Vec<String>,
        predictive_insights: Option<PredictiveInsights>,
    ) -> Self {
        recommendations.truncate(MAX_RECOMMENDATIONS);
        Self {
            date,
            energy_profile,
            guidance,
            recommendations,
            predictive_insights,
            degraded: false,
        }
    }

    /// Placeholder for a day with no usable data
    #[must_use]
    pub fn placeholder(date: NaiveDate) -> Self {
        let guidance = ForecastGuidance::new(
            Vec::new(),
            format!(
                "Forecast details for {date} are temporarily unavailable. Keep a steady pace and check back later."
            ),
            Vec::new(),
        );
        Self {
            date,
            energy_profile: EnergyProfile::neutral(),
            guidance,
            recommendations: vec!["Keep your plans flexible until the full forecast is available".to_owned()],
            predictive_insights: None,
            degraded: true,
        }
    }

    /// Compact view for launcher-style integrations
    #[must_use]
    pub fn compact(&self) -> Self {
        let mut compact = self.clone();
        if compact.guidance.synthesis.chars().count() > RAYCAST_SYNTHESIS_CHARS {
            let mut text: String = compact
                .guidance
                .synthesis
                .chars()
                .take(RAYCAST_SYNTHESIS_CHARS - 1)
                .collect();
            text.push('…');
            compact.guidance.synthesis = text;
        }
        compact.guidance.key_themes.truncate(RAYCAST_THEMES);
        compact.recommendations.truncate(RAYCAST_RECOMMENDATIONS);
        compact
    }
}

/// Week-level narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyInsights {
    /// Dominant energy pattern phrase
    pub energy_pattern: String,
    /// Curated theme label
    pub weekly_theme: String,
    /// Chronological day-to-day changes, at most five
    pub key_transitions: Vec<String>,
}

/// Forecast for one user and one Monday-based week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyForecast {
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Sunday of the week
    pub week_end: NaiveDate,
    /// Frequency-ranked themes across the week
    pub dominant_themes: Vec<String>,
    /// Exactly seven days, ascending
    pub daily_forecasts: Vec<DailyForecast>,
    /// Week-level narrative
    pub weekly_insights: WeeklyInsights,
    /// At most three
    pub challenges: Vec<String>,
    /// At most three
    pub opportunities: Vec<String>,
}

impl WeeklyForecast {
    /// Whether any day is a placeholder
    #[must_use]
    pub fn has_degraded_days(&self) -> bool {
        self.daily_forecasts.iter().any(|d| d.degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_recommendations_capped() {
        let recs = (0..10).map(|i| format!("rec {i}")).collect();
        let forecast = DailyForecast::new(
            date(),
            EnergyProfile::neutral(),
            ForecastGuidance::new(vec![], "s".to_owned(), vec![]),
            recs,
            None,
        );
        assert_eq!(forecast.recommendations.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_placeholder_references_date() {
        let placeholder = DailyForecast::placeholder(date());
        assert!(placeholder.degraded);
        assert!(placeholder.guidance.synthesis.contains("2024-06-10"));
    }

    #[test]
    fn test_compact_truncates() {
        let mut forecast = DailyForecast::placeholder(date());
        forecast.guidance.synthesis = "x".repeat(500);
        forecast.recommendations = (0..6).map(|i| i.to_string()).collect();
        let compact = forecast.compact();
        assert_eq!(compact.guidance.synthesis.chars().count(), RAYCAST_SYNTHESIS_CHARS);
        assert_eq!(compact.recommendations.len(), RAYCAST_RECOMMENDATIONS);
        assert_eq!(forecast.recommendations.len(), 6);
    }
}
