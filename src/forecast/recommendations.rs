// ABOUTME: Recommendation and template text derived from the energy profile
// ABOUTME: Energy banding first, then predictive optimal actions, capped at six
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::limits::MAX_RECOMMENDATIONS;
use crate::models::{EnergyLevel, EnergyProfile, EnergyTrend, PredictiveInsights};
use chrono::NaiveDate;

const fn banding_recommendations(level: EnergyLevel) -> [&'static str; 2] {
    match level {
        EnergyLevel::High => [
            "High energy day: schedule your most demanding work and physical challenges",
            "Use the momentum to start something you have been postponing",
        ],
        EnergyLevel::Medium => [
            "Moderate energy: pace yourself and prioritize the essentials",
            "Alternate focused work with short restorative breaks",
        ],
        EnergyLevel::Low => [
            "Low energy day: protect your reserves and keep commitments light",
            "Favor rest, reflection and gentle movement over intense effort",
        ],
    }
}

const fn trend_recommendation(trend: EnergyTrend) -> Option<&'static str> {
    match trend {
        EnergyTrend::Ascending => Some("Energy is building: line up bigger pushes for the coming days"),
        EnergyTrend::Descending => Some("Energy is tapering: front-load the tasks that matter most"),
        EnergyTrend::Volatile => Some("Expect swings today: leave slack in your schedule"),
        EnergyTrend::Stable => None,
    }
}

/// Recommendations for one day, deduplicated and capped
#[must_use]
pub fn build_recommendations(
    date: NaiveDate,
    profile: &EnergyProfile,
    insights: Option<&PredictiveInsights>,
) -> Vec<String> {
    let mut recommendations: Vec<String> = banding_recommendations(profile.overall_energy())
        .iter()
        .map(|s| (*s).to_owned())
        .collect();

    if let Some(insights) = insights {
        recommendations.extend(
            insights
                .optimal_actions
                .iter()
                .map(|action| format!("{}: {}", action.timing, action.action)),
        );
    }
    if profile.is_critical(date) {
        recommendations.push("Critical cycle day: double-check important decisions".to_owned());
    }
    if let Some(timing) = &profile.optimal_timing {
        recommendations.push(format!(
            "Best window today: {} ({} peak)",
            timing.best_hours, timing.peak
        ));
    }
    if let Some(text) = trend_recommendation(profile.trend) {
        recommendations.push(text.to_owned());
    }

    let mut unique: Vec<String> = Vec::with_capacity(MAX_RECOMMENDATIONS);
    for recommendation in recommendations {
        if unique.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !unique.contains(&recommendation) {
            unique.push(recommendation);
        }
    }
    unique
}

/// Deterministic synthesis used when no model produced one
#[must_use]
pub fn template_synthesis(date: NaiveDate, profile: &EnergyProfile) -> String {
    let outlook = match profile.overall_energy() {
        EnergyLevel::High => "a strong day to act on what matters and make visible progress",
        EnergyLevel::Medium => "a balanced day for steady progress without overextending",
        EnergyLevel::Low => "a day to conserve energy, reflect and recharge",
    };
    format!(
        "Your energy forecast for {}: {} energy with a {} trend. Treat it as {outlook}.",
        date.format("%A, %B %-d, %Y"),
        profile.overall_energy(),
        profile.trend,
    )
}
