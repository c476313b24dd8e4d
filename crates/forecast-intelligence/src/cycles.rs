// ABOUTME: Tolerant parsing of numeric cycle engine payloads into energy profiles
// ABOUTME: Derives overall energy, series trend, critical days and optimal hours
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Numeric engines are not consistent about payload shape. Cycle values are
//! accepted from `cycles.{name}.percentage`, `cycles.{name}` or a top-level
//! `{name}`; the overall energy falls back to the mean of whatever cycles are
//! present. `forecast[]` carries the series and `critical_days[]` the dates
//! the engine itself flags.

use crate::constants::energy::banding::{ASCENDING_SLOPE, VALUE_MAX, VALUE_MIN, VOLATILE_STEP};
use crate::constants::energy::predictive::TREND_WINDOW;
use crate::models::{CycleValues, EnergyProfile, EnergyTrend, OptimalTiming};
use crate::statistical_analysis::StatisticalAnalyzer;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Best hours when the physical cycle peaks
pub const PHYSICAL_WINDOW: &str = "06:00-10:00";
/// Best hours when the intellectual cycle peaks
pub const INTELLECTUAL_WINDOW: &str = "09:00-12:00";
/// Best hours when the emotional cycle peaks
pub const EMOTIONAL_WINDOW: &str = "14:00-18:00";

const CYCLE_NAMES: [&str; 3] = ["physical", "emotional", "intellectual"];

/// Hour window associated with a cycle name
#[must_use]
pub fn window_for(cycle: &str) -> &'static str {
    match cycle {
        "physical" => PHYSICAL_WINDOW,
        "intellectual" => INTELLECTUAL_WINDOW,
        _ => EMOTIONAL_WINDOW,
    }
}

/// One day of the numeric series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// Day
    pub date: NaiveDate,
    /// Overall energy for the day
    pub energy: f64,
    /// Cycle values for the day
    pub cycles: CycleValues,
}

/// Interpreted numeric engine output for one requested day
#[derive(Debug, Clone, PartialEq)]
pub struct NumericReading {
    /// Requested day
    pub date: NaiveDate,
    /// Overall energy value, explicit or derived from the cycles
    pub overall_energy: Option<f64>,
    /// Cycle values for the requested day
    pub cycles: CycleValues,
    /// Forecast series in ascending date order
    pub series: Vec<SeriesPoint>,
    /// Dates the engine flags as critical
    pub critical_days: BTreeSet<NaiveDate>,
}

/// Finite values only, clamped to the signed percentage range
fn number(value: Option<&Value>) -> Option<f64> {
    let raw = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        Value::Object(map) => number(map.get("percentage").or_else(|| map.get("value"))),
        _ => None,
    }?;
    raw.is_finite().then(|| raw.clamp(VALUE_MIN, VALUE_MAX))
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn cycles_from(map: &Map<String, Value>) -> CycleValues {
    let nested = map.get("cycles").and_then(Value::as_object);
    let lookup = |name: &str| number(nested.and_then(|c| c.get(name))).or_else(|| number(map.get(name)));
    CycleValues::new(
        lookup(CYCLE_NAMES[0]),
        lookup(CYCLE_NAMES[1]),
        lookup(CYCLE_NAMES[2]),
    )
}

fn energy_from(map: &Map<String, Value>, cycles: &CycleValues) -> Option<f64> {
    number(map.get("overall_energy"))
        .or_else(|| number(map.get("overallEnergy")))
        .or_else(|| number(map.get("energy")))
        .or_else(|| cycles.average())
}

impl NumericReading {
    /// Interpret a numeric engine payload for `date`
    ///
    /// Unrecognized shapes yield a reading with no values rather than an error.
    #[must_use]
    pub fn from_payload(date: NaiveDate, payload: &Value) -> Self {
        let empty = Map::new();
        let map = payload.as_object().unwrap_or(&empty);

        let mut series: Vec<SeriesPoint> = map
            .get("forecast")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let entry = entry.as_object()?;
                        let day = entry.get("date").and_then(parse_date)?;
                        let cycles = cycles_from(entry);
                        let energy = energy_from(entry, &cycles)?;
                        Some(SeriesPoint {
                            date: day,
                            energy,
                            cycles,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        series.sort_by_key(|point| point.date);
        series.dedup_by_key(|point| point.date);

        let mut cycles = cycles_from(map);
        if cycles.is_empty() {
            if let Some(today) = series.iter().find(|p| p.date == date) {
                cycles = today.cycles;
            }
        }
        let overall_energy = energy_from(map, &cycles)
            .or_else(|| series.iter().find(|p| p.date == date).map(|p| p.energy));

        let critical_days = map
            .get("critical_days")
            .or_else(|| map.get("criticalDays"))
            .and_then(Value::as_array)
            .map(|days| {
                days.iter()
                    .filter_map(|d| {
                        parse_date(d).or_else(|| d.get("date").and_then(parse_date))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            date,
            overall_energy,
            cycles,
            series,
            critical_days,
        }
    }

    /// Series used for analysis; a lone point for the day when the engine sent none
    #[must_use]
    pub fn analysis_series(&self) -> Vec<SeriesPoint> {
        if !self.series.is_empty() {
            return self.series.clone();
        }
        self.overall_energy
            .map(|energy| SeriesPoint {
                date: self.date,
                energy,
                cycles: self.cycles,
            })
            .into_iter()
            .collect()
    }

    /// Energy values of the analysis series
    #[must_use]
    pub fn energy_values(&self) -> Vec<f64> {
        self.analysis_series().iter().map(|p| p.energy).collect()
    }

    /// Series trend label over the first `TREND_WINDOW` days
    #[must_use]
    pub fn trend(&self) -> EnergyTrend {
        let values = self.energy_values();
        let window = &values[..values.len().min(TREND_WINDOW)];
        if StatisticalAnalyzer::max_step(window) > VOLATILE_STEP {
            return EnergyTrend::Volatile;
        }
        match StatisticalAnalyzer::linear_regression(window) {
            Ok(fit) if fit.slope > ASCENDING_SLOPE => EnergyTrend::Ascending,
            Ok(fit) if fit.slope < -ASCENDING_SLOPE => EnergyTrend::Descending,
            _ => EnergyTrend::Stable,
        }
    }

    /// Best and worst hours from the strongest and weakest cycles
    #[must_use]
    pub fn optimal_timing(&self) -> Option<OptimalTiming> {
        let named = self.cycles.named();
        let (peak, _) = named
            .iter()
            .copied()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })?;
        let avoid_hours = named
            .iter()
            .copied()
            .reduce(|low, next| if next.1 < low.1 { next } else { low })
            .filter(|(name, value)| *value < 0.0 && *name != peak)
            .map(|(name, _)| window_for(name).to_owned());
        Some(OptimalTiming {
            best_hours: window_for(peak).to_owned(),
            avoid_hours,
            peak: peak.to_owned(),
        })
    }

    /// Energy profile for the requested day
    #[must_use]
    pub fn energy_profile(&self) -> EnergyProfile {
        EnergyProfile::new(
            self.overall_energy,
            self.trend(),
            self.cycles,
            self.critical_days.clone(),
            self.optimal_timing(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnergyLevel;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_overall_energy_explicit() {
        let reading = NumericReading::from_payload(day(10), &json!({ "overall_energy": 75 }));
        assert_eq!(reading.overall_energy, Some(75.0));
        assert_eq!(reading.energy_profile().overall_energy(), EnergyLevel::High);
        assert!(reading.optimal_timing().is_none());
    }

    #[test]
    fn test_cycle_shapes_and_mean_fallback() {
        let payload = json!({
            "cycles": {
                "physical": { "percentage": 80 },
                "emotional": -20
            },
            "intellectual": "30%"
        });
        let reading = NumericReading::from_payload(day(10), &payload);
        assert_eq!(reading.cycles, CycleValues::new(Some(80.0), Some(-20.0), Some(30.0)));
        assert_eq!(reading.overall_energy, Some(30.0));

        let timing = reading.optimal_timing().unwrap();
        assert_eq!(timing.peak, "physical");
        assert_eq!(timing.best_hours, PHYSICAL_WINDOW);
        assert_eq!(timing.avoid_hours.as_deref(), Some(EMOTIONAL_WINDOW));
    }

    #[test]
    fn test_series_trend_and_critical_days() {
        let payload = json!({
            "forecast": [
                { "date": "2024-06-12", "overall_energy": 30 },
                { "date": "2024-06-10", "overall_energy": 10 },
                { "date": "2024-06-11", "overall_energy": 20 },
                { "date": "not-a-date", "overall_energy": 99 }
            ],
            "critical_days": ["2024-06-14", { "date": "2024-06-16" }, 42]
        });
        let reading = NumericReading::from_payload(day(10), &payload);
        assert_eq!(reading.series.len(), 3);
        assert_eq!(reading.series[0].date, day(10));
        assert_eq!(reading.overall_energy, Some(10.0));
        assert_eq!(reading.trend(), EnergyTrend::Ascending);
        assert_eq!(
            reading.critical_days.iter().copied().collect::<Vec<_>>(),
            vec![day(14), day(16)]
        );
    }

    #[test]
    fn test_volatile_series() {
        let payload = json!({
            "forecast": [
                { "date": "2024-06-10", "overall_energy": -40 },
                { "date": "2024-06-11", "overall_energy": 30 }
            ]
        });
        assert_eq!(
            NumericReading::from_payload(day(10), &payload).trend(),
            EnergyTrend::Volatile
        );
    }

    #[test]
    fn test_non_finite_and_out_of_range_values() {
        let payload = json!({
            "cycles": { "physical": "NaN", "emotional": "inf", "intellectual": 250 },
            "forecast": [
                { "date": "2024-06-10", "overall_energy": "NaN" },
                { "date": "2024-06-11", "overall_energy": "-infinity" },
                { "date": "2024-06-12", "overall_energy": -180 }
            ]
        });
        let reading = NumericReading::from_payload(day(10), &payload);
        assert_eq!(reading.cycles, CycleValues::new(None, None, Some(100.0)));
        assert_eq!(reading.overall_energy, Some(100.0));
        assert_eq!(reading.series.len(), 1);
        assert_eq!(reading.series[0].energy, -100.0);
        assert!(reading.energy_values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_trend_uses_first_week_only() {
        let forecast: Vec<_> = (10..24)
            .map(|d| {
                let energy = if d < 17 { 10 * (d - 10) } else { 60 - 10 * (d - 17) };
                json!({ "date": format!("2024-06-{d:02}"), "overall_energy": energy })
            })
            .collect();
        let reading = NumericReading::from_payload(day(10), &json!({ "forecast": forecast }));
        assert_eq!(reading.series.len(), 14);
        assert_eq!(reading.trend(), EnergyTrend::Ascending);
    }

    #[test]
    fn test_unrecognized_payload() {
        let reading = NumericReading::from_payload(day(10), &json!(["unexpected"]));
        assert!(reading.overall_energy.is_none());
        assert_eq!(reading.trend(), EnergyTrend::Stable);
        assert_eq!(reading.energy_profile().overall_energy(), EnergyLevel::Medium);
    }
}
