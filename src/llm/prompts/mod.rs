// ABOUTME: Prompts for forecast synthesis, system prompt loaded at compile time
// ABOUTME: Builds the per-day user prompt from engine readings and request context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # Synthesis Prompts
//!
//! The system prompt lives in a markdown file for easy maintenance. The
//! section headings it asks for are the ones the response parser looks for.

use crate::models::SymbolicReading;
use chrono::NaiveDate;
use std::fmt::Write;

/// System prompt for daily forecast synthesis
pub const FORECAST_SYSTEM_PROMPT: &str = include_str!("forecast_system.md");

/// Largest serialized engine payload included verbatim
const MAX_READING_CHARS: usize = 4_000;

/// Get the system prompt for forecast synthesis
#[must_use]
pub const fn forecast_system_prompt() -> &'static str {
    FORECAST_SYSTEM_PROMPT
}

/// User prompt for one forecast day
#[must_use]
pub fn forecast_user_prompt(
    date: NaiveDate,
    focus: Option<&str>,
    readings: &[SymbolicReading],
) -> String {
    let mut prompt = format!("Forecast date: {}\n", date.format("%A, %B %-d, %Y"));
    if let Some(focus) = focus.filter(|f| !f.trim().is_empty()) {
        let _ = writeln!(prompt, "Focus area: {}", focus.trim());
    }
    prompt.push('\n');

    if readings.is_empty() {
        prompt.push_str("No engine data is available for this day. Offer general, grounded guidance.\n");
        return prompt;
    }

    prompt.push_str("Engine results:\n");
    for reading in readings {
        let mut payload = reading.data.to_string();
        if payload.len() > MAX_READING_CHARS {
            let cut = (0..=MAX_READING_CHARS)
                .rev()
                .find(|i| payload.is_char_boundary(*i))
                .unwrap_or(0);
            payload.truncate(cut);
            payload.push_str(" ...");
        }
        let _ = writeln!(prompt, "\n### {}\n{payload}", reading.engine);
    }
    prompt
}
