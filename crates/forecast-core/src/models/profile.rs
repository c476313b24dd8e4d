// ABOUTME: User birth data and forecast preferences consumed from the profile store
// ABOUTME: Birth date is the only field the pipeline requires
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Birth place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthLocation {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// IANA timezone name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Forecast preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPreferences {
    /// Life area the user wants guidance on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

/// Profile as returned by the user profile store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Birth date
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Birth time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<NaiveTime>,
    /// Birth place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<BirthLocation>,
    /// Preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<ForecastPreferences>,
}

impl UserProfile {
    /// Profile with only a birth date
    #[must_use]
    pub fn with_birth_date(birth_date: NaiveDate) -> Self {
        Self {
            birth_date: Some(birth_date),
            ..Self::default()
        }
    }

    /// Birth date, or a `MISSING_REQUIRED_FIELD` error
    ///
    /// # Errors
    ///
    /// Returns an error when the profile has no birth date
    pub fn required_birth_date(&self) -> AppResult<NaiveDate> {
        self.birth_date
            .ok_or_else(|| AppError::missing_field("birth_date"))
    }

    /// Preferred focus area
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.preferences.as_ref().and_then(|p| p.focus.as_deref())
    }
}
