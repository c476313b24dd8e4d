// ABOUTME: Narrative guidance for a forecast day
// ABOUTME: Up to two opaque symbolic readings plus synthesis text and ranked themes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::limits::MAX_KEY_THEMES;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque output of a narrative calculation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicReading {
    /// Engine that produced the reading
    pub engine: String,
    /// Engine payload, untouched
    pub data: Value,
}

/// Guidance section of a daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastGuidance {
    /// First narrative reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_reading: Option<SymbolicReading>,
    /// Second narrative reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_reading: Option<SymbolicReading>,
    /// Model-written or templated synthesis, never empty
    pub synthesis: String,
    /// Frequency-ranked themes
    #[serde(default)]
    pub key_themes: Vec<String>,
}

impl ForecastGuidance {
    /// Build guidance; readings beyond the second are dropped and themes are
    /// deduplicated and capped while keeping their ranking order
    #[must_use]
    pub fn new(readings: Vec<SymbolicReading>, synthesis: String, key_themes: Vec<String>) -> Self {
        let mut readings = readings.into_iter();
        let mut themes: Vec<String> = Vec::with_capacity(MAX_KEY_THEMES);
        for theme in key_themes {
            if themes.len() == MAX_KEY_THEMES {
                break;
            }
            if !themes.iter().any(|t| t.eq_ignore_ascii_case(&theme)) {
                themes.push(theme);
            }
        }
        Self {
            primary_reading: readings.next(),
            secondary_reading: readings.next(),
            synthesis,
            key_themes: themes,
        }
    }

    /// Readings present, in order
    #[must_use]
    pub fn readings(&self) -> Vec<&SymbolicReading> {
        self.primary_reading
            .iter()
            .chain(self.secondary_reading.iter())
            .collect()
    }
}
