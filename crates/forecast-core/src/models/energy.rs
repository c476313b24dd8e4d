// ABOUTME: Energy level banding, trend labels, cycle values, and the daily energy profile
// ABOUTME: Overall energy is always derived from the cycle average, never set directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::energy::banding::{HIGH_ENERGY_ABOVE, MEDIUM_ENERGY_ABOVE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Banded overall energy for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    /// Average above the high band
    High,
    /// Average in the middle band, and the neutral default
    Medium,
    /// Average at or below zero
    Low,
}

impl EnergyLevel {
    /// Band a cycle average; missing data is medium
    #[must_use]
    pub fn from_average(average: Option<f64>) -> Self {
        match average {
            Some(value) if value > HIGH_ENERGY_ABOVE => Self::High,
            Some(value) if value > MEDIUM_ENERGY_ABOVE => Self::Medium,
            Some(_) => Self::Low,
            None => Self::Medium,
        }
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the energy series around a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyTrend {
    /// Rising
    Ascending,
    /// Falling
    Descending,
    /// Flat
    Stable,
    /// Large day-over-day swings
    Volatile,
}

impl EnergyTrend {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Stable => "stable",
            Self::Volatile => "volatile",
        }
    }
}

impl fmt::Display for EnergyTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed cycle percentages (-100..=100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleValues {
    /// Physical cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical: Option<f64>,
    /// Emotional cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional: Option<f64>,
    /// Intellectual cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intellectual: Option<f64>,
}

impl CycleValues {
    /// Build from the three cycles
    #[must_use]
    pub const fn new(physical: Option<f64>, emotional: Option<f64>, intellectual: Option<f64>) -> Self {
        Self {
            physical,
            emotional,
            intellectual,
        }
    }

    /// Present cycles in fixed order (physical, emotional, intellectual)
    #[must_use]
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        [
            ("physical", self.physical),
            ("emotional", self.emotional),
            ("intellectual", self.intellectual),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Mean of the present cycles
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        let present = self.named();
        if present.is_empty() {
            return None;
        }
        Some(present.iter().map(|(_, v)| v).sum::<f64>() / present.len() as f64)
    }

    /// Whether no cycle is present
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.physical.is_none() && self.emotional.is_none() && self.intellectual.is_none()
    }
}

/// Best and worst hours of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalTiming {
    /// Hour range to schedule demanding work
    pub best_hours: String,
    /// Hour range to keep light
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_hours: Option<String>,
    /// Which cycle peaks
    pub peak: String,
}

/// Per-day energy summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyProfile {
    overall_energy: EnergyLevel,
    /// Series trend around the day
    pub trend: EnergyTrend,
    /// Cycle values for the day
    #[serde(default, skip_serializing_if = "CycleValues::is_empty")]
    pub cycles: CycleValues,
    /// Known critical dates, ascending
    #[serde(default)]
    pub critical_days: BTreeSet<NaiveDate>,
    /// Hour guidance when cycle data is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_timing: Option<OptimalTiming>,
}

impl EnergyProfile {
    /// Build a profile; overall energy is banded from `energy_average`
    #[must_use]
    pub fn new(
        energy_average: Option<f64>,
        trend: EnergyTrend,
        cycles: CycleValues,
        critical_days: BTreeSet<NaiveDate>,
        optimal_timing: Option<OptimalTiming>,
    ) -> Self {
        Self {
            overall_energy: EnergyLevel::from_average(energy_average),
            trend,
            cycles,
            critical_days,
            optimal_timing,
        }
    }

    /// Profile used when no numeric cycle data is available
    #[must_use]
    pub fn neutral() -> Self {
        Self::new(
            None,
            EnergyTrend::Stable,
            CycleValues::default(),
            BTreeSet::new(),
            None,
        )
    }

    /// Banded overall energy
    #[must_use]
    pub const fn overall_energy(&self) -> EnergyLevel {
        self.overall_energy
    }

    /// Whether `date` is a known critical day
    #[must_use]
    pub fn is_critical(&self, date: NaiveDate) -> bool {
        self.critical_days.contains(&date)
    }
}
