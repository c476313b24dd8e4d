// ABOUTME: Aggregates seven daily forecasts into a week-level summary
// ABOUTME: Majority-vote energy pattern, curated theme labels, transitions, challenges and opportunities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::energy::weekly::{
    HIGH_DAYS_FOR_OPPORTUNITY, LOW_DAYS_FOR_CHALLENGE, MAX_ENTRIES, MAX_TRANSITIONS,
    THEME_LABEL_CANDIDATES, VOLATILE_DAYS_FOR_CHALLENGE,
};
use crate::constants::limits::{DAYS_PER_WEEK, MAX_KEY_THEMES};
use crate::errors::{AppError, AppResult};
use crate::models::{
    CriticalPeriodType, DailyForecast, EnergyLevel, EnergyTrend, WeeklyForecast, WeeklyInsights,
};
use crate::themes::rank_themes;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

const ENERGY_ORDER: [EnergyLevel; 3] = [EnergyLevel::High, EnergyLevel::Medium, EnergyLevel::Low];
const TREND_ORDER: [EnergyTrend; 4] = [
    EnergyTrend::Ascending,
    EnergyTrend::Descending,
    EnergyTrend::Stable,
    EnergyTrend::Volatile,
];

/// Curated labels for theme pairs that commonly appear together
const THEME_PAIR_LABELS: [(&str, &str, &str); 8] = [
    ("growth", "transformation", "Growth Through Transformation"),
    ("balance", "harmony", "Finding Balance & Harmony"),
    ("creativity", "communication", "Creative Expression"),
    ("reflection", "patience", "Patient Reflection"),
    ("change", "renewal", "Renewal & Fresh Starts"),
    ("clarity", "focus", "Focused Clarity"),
    ("connection", "communication", "Meaningful Connections"),
    ("intuition", "wisdom", "Inner Wisdom"),
];

/// Label when the week produced no themes at all
const GENERIC_WEEKLY_THEME: &str = "Personal Growth & Self-Discovery";

/// Monday of the week containing `date`
#[must_use]
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn weekday(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

fn day_list(days: &[&DailyForecast]) -> String {
    days.iter()
        .map(|d| weekday(d.date))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Winner of a vote plus its count; ties go to the earliest value in `order`
fn majority<T: Copy + PartialEq>(values: &[T], order: &[T]) -> (T, usize) {
    let mut best = (order[0], 0);
    for candidate in order {
        let count = values.iter().filter(|v| *v == candidate).count();
        if count > best.1 {
            best = (*candidate, count);
        }
    }
    best
}

fn pattern_phrase(energy: EnergyLevel, trend: EnergyTrend) -> Option<&'static str> {
    use EnergyLevel::{High, Low, Medium};
    use EnergyTrend::{Ascending, Descending, Stable, Volatile};
    Some(match (energy, trend) {
        (High, Ascending) => "Building momentum: energy climbs through a strong week",
        (High, Stable) => "Sustained high energy: a consistently productive week",
        (High, Descending) => "Strong start that tapers: front-load demanding work",
        (High, Volatile) => "High but uneven energy: ride the peaks and rest in the dips",
        (Medium, Ascending) => "Gradual build: energy improves as the week unfolds",
        (Medium, Stable) => "Steady and balanced: a week for consistent progress",
        (Medium, Descending) => "Gentle wind-down: pace yourself toward the weekend",
        (Low, Ascending) => "Recovery and renewal: energy returns later in the week",
        (Low, Stable) => "Restorative week: prioritize rest and reflection",
        (Low, Descending) => "Conservation mode: protect your energy and simplify plans",
        (Medium | Low, Volatile) => return None,
    })
}

/// Stateless weekly aggregation
pub struct WeeklySynthesizer;

impl WeeklySynthesizer {
    /// Aggregate exactly seven daily forecasts for the week starting `week_start`
    ///
    /// # Errors
    ///
    /// Returns an error unless there are exactly seven forecasts
    pub fn synthesize(
        week_start: NaiveDate,
        mut daily_forecasts: Vec<DailyForecast>,
    ) -> AppResult<WeeklyForecast> {
        if daily_forecasts.len() != DAYS_PER_WEEK {
            return Err(AppError::invalid_input(format!(
                "Weekly synthesis needs {DAYS_PER_WEEK} daily forecasts, got {}",
                daily_forecasts.len()
            )));
        }
        daily_forecasts.sort_by_key(|d| d.date);
        let week_start = week_start_of(week_start);

        let all_themes = || {
            daily_forecasts
                .iter()
                .flat_map(|d| d.guidance.key_themes.iter().map(String::as_str))
        };
        let dominant_themes = rank_themes(all_themes(), MAX_KEY_THEMES);
        let top_themes = rank_themes(all_themes(), THEME_LABEL_CANDIDATES);

        let weekly_insights = WeeklyInsights {
            energy_pattern: Self::energy_pattern(&daily_forecasts),
            weekly_theme: Self::weekly_theme(&top_themes),
            key_transitions: Self::key_transitions(&daily_forecasts),
        };
        let challenges = Self::challenges(&daily_forecasts);
        let opportunities = Self::opportunities(&daily_forecasts);

        debug!(
            %week_start,
            pattern = %weekly_insights.energy_pattern,
            themes = dominant_themes.len(),
            "Synthesized weekly forecast"
        );

        Ok(WeeklyForecast {
            week_start,
            week_end: week_start + Duration::days(6),
            dominant_themes,
            daily_forecasts,
            weekly_insights,
            challenges,
            opportunities,
        })
    }

    /// Dominant pattern phrase from energy and trend majorities
    #[must_use]
    pub fn energy_pattern(days: &[DailyForecast]) -> String {
        let levels: Vec<EnergyLevel> = days.iter().map(|d| d.energy_profile.overall_energy()).collect();
        let trends: Vec<EnergyTrend> = days.iter().map(|d| d.energy_profile.trend).collect();
        let (energy, energy_votes) = majority(&levels, &ENERGY_ORDER);
        let (trend, trend_votes) = majority(&trends, &TREND_ORDER);

        if let Some(phrase) = pattern_phrase(energy, trend) {
            return phrase.to_owned();
        }
        if trend_votes > energy_votes {
            format!("Predominantly {trend} energy: expect shifting rhythms this week")
        } else {
            format!("Predominantly {energy} energy with shifting rhythms this week")
        }
    }

    /// Curated label for the top themes
    #[must_use]
    pub fn weekly_theme(top_themes: &[String]) -> String {
        let lowered: Vec<String> = top_themes.iter().map(|t| t.to_lowercase()).collect();
        for (i, first) in lowered.iter().enumerate() {
            for second in &lowered[i + 1..] {
                let label = THEME_PAIR_LABELS.iter().find(|(a, b, _)| {
                    (*a == first.as_str() && *b == second.as_str())
                        || (*a == second.as_str() && *b == first.as_str())
                });
                if let Some((_, _, label)) = label {
                    return (*label).to_owned();
                }
            }
        }
        top_themes.first().map_or_else(
            || GENERIC_WEEKLY_THEME.to_owned(),
            |top| format!("{top} & Personal Development"),
        )
    }

    /// Day-to-day changes in chronological order
    #[must_use]
    pub fn key_transitions(days: &[DailyForecast]) -> Vec<String> {
        let mut transitions = Vec::new();
        for pair in days.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            let name = weekday(current.date);
            let (from, to) = (
                previous.energy_profile.overall_energy(),
                current.energy_profile.overall_energy(),
            );
            if from != to {
                transitions.push(format!("{name}: energy shifts from {from} to {to}"));
            }
            if previous.energy_profile.trend != current.energy_profile.trend {
                transitions.push(format!(
                    "{name}: trend turns {}",
                    current.energy_profile.trend
                ));
            }
            if current.energy_profile.is_critical(current.date)
                && !previous.energy_profile.is_critical(previous.date)
            {
                transitions.push(format!("{name}: critical day begins"));
            }
        }
        transitions.truncate(MAX_TRANSITIONS);
        transitions
    }

    /// Threshold-counted warnings
    #[must_use]
    pub fn challenges(days: &[DailyForecast]) -> Vec<String> {
        let low: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| d.energy_profile.overall_energy() == EnergyLevel::Low)
            .collect();
        let volatile: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| d.energy_profile.trend == EnergyTrend::Volatile)
            .collect();
        let critical: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| d.energy_profile.is_critical(d.date))
            .collect();

        let mut challenges = Vec::new();
        if low.len() >= LOW_DAYS_FOR_CHALLENGE {
            challenges.push(format!(
                "Low energy on {}: schedule recovery and lighter commitments",
                day_list(&low)
            ));
        }
        if volatile.len() >= VOLATILE_DAYS_FOR_CHALLENGE {
            challenges.push(format!(
                "Volatile energy on {}: build buffers into your plans",
                day_list(&volatile)
            ));
        }
        if !critical.is_empty() {
            challenges.push(format!(
                "Critical days on {}: double-check important decisions",
                day_list(&critical)
            ));
        }
        challenges.truncate(MAX_ENTRIES);
        challenges
    }

    /// Threshold-counted openings
    #[must_use]
    pub fn opportunities(days: &[DailyForecast]) -> Vec<String> {
        let high: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| d.energy_profile.overall_energy() == EnergyLevel::High)
            .collect();
        let ascending: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| d.energy_profile.trend == EnergyTrend::Ascending)
            .collect();
        let peaks: Vec<&DailyForecast> = days
            .iter()
            .filter(|d| {
                d.predictive_insights.as_ref().is_some_and(|insights| {
                    insights.critical_periods.iter().any(|p| {
                        p.date == d.date && p.period_type == CriticalPeriodType::Opportunity
                    })
                })
            })
            .collect();

        let mut opportunities = Vec::new();
        if high.len() >= HIGH_DAYS_FOR_OPPORTUNITY {
            opportunities.push(format!(
                "High energy on {}: plan demanding work and key meetings",
                day_list(&high)
            ));
        }
        if ascending.len() >= HIGH_DAYS_FOR_OPPORTUNITY {
            opportunities.push(format!(
                "Rising energy on {}: launch new initiatives",
                day_list(&ascending)
            ));
        }
        if !peaks.is_empty() {
            opportunities.push(format!(
                "Peak energy on {}: reserve it for your most ambitious goals",
                day_list(&peaks)
            ));
        }
        opportunities.truncate(MAX_ENTRIES);
        opportunities
    }
}
