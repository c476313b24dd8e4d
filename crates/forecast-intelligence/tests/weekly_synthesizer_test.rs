// ABOUTME: Tests for weekly aggregation of daily forecasts
// ABOUTME: Pattern rule table, theme labels, transitions, and threshold heuristics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Duration, NaiveDate};
use forecast_core::models::{
    CycleValues, DailyForecast, EnergyProfile, EnergyTrend, ForecastGuidance,
};
use forecast_intelligence::{week_start_of, WeeklySynthesizer};
use std::collections::BTreeSet;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn day(offset: i64, energy: f64, trend: EnergyTrend, themes: &[&str]) -> DailyForecast {
    let date = monday() + Duration::days(offset);
    DailyForecast::new(
        date,
        EnergyProfile::new(Some(energy), trend, CycleValues::default(), BTreeSet::new(), None),
        ForecastGuidance::new(
            vec![],
            format!("Synthesis for {date}"),
            themes.iter().map(|t| (*t).to_owned()).collect(),
        ),
        vec![],
        None,
    )
}

fn week(energies: [f64; 7], trend: EnergyTrend) -> Vec<DailyForecast> {
    energies
        .iter()
        .enumerate()
        .map(|(i, e)| day(i as i64, *e, trend, &[]))
        .collect()
}

#[test]
fn test_week_start_normalized_to_monday() {
    let thursday = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
    assert_eq!(week_start_of(thursday), monday());
    assert_eq!(week_start_of(sunday), monday());
    assert_eq!(week_start_of(monday()), monday());
}

#[test]
fn test_requires_exactly_seven_days() {
    let mut days = week([10.0; 7], EnergyTrend::Stable);
    days.pop();
    assert!(WeeklySynthesizer::synthesize(monday(), days).is_err());
}

#[test]
fn test_days_sorted_and_week_bounds() {
    let mut days = week([10.0; 7], EnergyTrend::Stable);
    days.reverse();
    let weekly = WeeklySynthesizer::synthesize(monday() + Duration::days(3), days).unwrap();
    assert_eq!(weekly.week_start, monday());
    assert_eq!(weekly.week_end, monday() + Duration::days(6));
    assert_eq!(weekly.daily_forecasts.len(), 7);
    assert!(weekly
        .daily_forecasts
        .windows(2)
        .all(|pair| pair[0].date < pair[1].date));
}

#[test]
fn test_energy_pattern_rule_table() {
    let days = week([70.0, 80.0, 60.0, 75.0, 10.0, 20.0, -5.0], EnergyTrend::Ascending);
    assert!(WeeklySynthesizer::energy_pattern(&days).starts_with("Building momentum"));

    let days = week([10.0, 20.0, 30.0, 5.0, 15.0, 25.0, 35.0], EnergyTrend::Stable);
    assert!(WeeklySynthesizer::energy_pattern(&days).starts_with("Steady and balanced"));
}

#[test]
fn test_energy_pattern_table_miss_uses_stronger_majority() {
    // medium + volatile is not in the table; energy wins 7 vs 4
    let mut days = week([10.0; 7], EnergyTrend::Volatile);
    for d in days.iter_mut().take(3) {
        d.energy_profile.trend = EnergyTrend::Stable;
    }
    let pattern = WeeklySynthesizer::energy_pattern(&days);
    assert!(pattern.starts_with("Predominantly medium energy"), "{pattern}");
}

#[test]
fn test_weekly_theme_labels() {
    let themes = |list: &[&str]| list.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>();
    assert_eq!(
        WeeklySynthesizer::weekly_theme(&themes(&["Transformation", "Focus", "Growth"])),
        "Growth Through Transformation"
    );
    assert_eq!(
        WeeklySynthesizer::weekly_theme(&themes(&["Courage", "Rest"])),
        "Courage & Personal Development"
    );
    assert_eq!(
        WeeklySynthesizer::weekly_theme(&[]),
        "Personal Growth & Self-Discovery"
    );
}

#[test]
fn test_dominant_themes_ranked_across_days() {
    let days: Vec<DailyForecast> = (0..7)
        .map(|i| {
            let themes: &[&str] = if i % 2 == 0 {
                &["Balance", "Harmony"]
            } else {
                &["balance", "Rest"]
            };
            day(i, 10.0, EnergyTrend::Stable, themes)
        })
        .collect();
    let weekly = WeeklySynthesizer::synthesize(monday(), days).unwrap();
    assert_eq!(weekly.dominant_themes, vec!["Balance", "Harmony", "Rest"]);
    assert_eq!(weekly.weekly_insights.weekly_theme, "Finding Balance & Harmony");
}

#[test]
fn test_transitions_chronological_and_capped() {
    let days = week([70.0, -10.0, 70.0, -10.0, 70.0, -10.0, 70.0], EnergyTrend::Stable);
    let transitions = WeeklySynthesizer::key_transitions(&days);
    assert_eq!(transitions.len(), 5);
    assert_eq!(transitions[0], "Tuesday: energy shifts from high to low");
    assert_eq!(transitions[1], "Wednesday: energy shifts from low to high");
}

#[test]
fn test_challenges_and_opportunities_thresholds() {
    let days = week([-10.0, -20.0, -30.0, 70.0, 80.0, 10.0, 10.0], EnergyTrend::Stable);
    let challenges = WeeklySynthesizer::challenges(&days);
    let opportunities = WeeklySynthesizer::opportunities(&days);

    assert_eq!(challenges.len(), 1);
    assert!(challenges[0].contains("Monday, Tuesday, Wednesday"));
    assert_eq!(opportunities.len(), 1);
    assert!(opportunities[0].contains("Thursday, Friday"));

    let quiet = week([10.0; 7], EnergyTrend::Stable);
    assert!(WeeklySynthesizer::challenges(&quiet).is_empty());
    assert!(WeeklySynthesizer::opportunities(&quiet).is_empty());
}
