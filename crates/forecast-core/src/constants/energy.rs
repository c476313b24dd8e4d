// ABOUTME: Energy banding and predictive analysis thresholds
// ABOUTME: Two deliberately separate tables - daily banding and analyzer heuristics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! The daily `overallEnergy` band and the predictive analyzer use different
//! cut points. Both tables are kept as-is; unifying them would change the
//! meaning of cached forecasts.

/// Daily energy banding applied to the cycle average
pub mod banding {
    /// Average strictly above this is "high"
    pub const HIGH_ENERGY_ABOVE: f64 = 50.0;
    /// Average strictly above this (and not high) is "medium"
    pub const MEDIUM_ENERGY_ABOVE: f64 = 0.0;
    /// Slope above which a series is ascending
    pub const ASCENDING_SLOPE: f64 = 2.0;
    /// Single-step change above which a series is volatile
    pub const VOLATILE_STEP: f64 = 50.0;
    /// Lowest value a cycle or energy reading can take
    pub const VALUE_MIN: f64 = -100.0;
    /// Highest value a cycle or energy reading can take
    pub const VALUE_MAX: f64 = 100.0;
}

/// Predictive analyzer heuristics
pub mod predictive {
    /// Points used for trend regression
    pub const TREND_WINDOW: usize = 7;
    /// Fewer points than this yields a neutral trend
    pub const MIN_TREND_POINTS: usize = 3;
    /// Slope above which the trend is improving (below the negation, declining)
    pub const TREND_SLOPE_THRESHOLD: f64 = 2.0;
    /// Confidence reported without enough data
    pub const NEUTRAL_CONFIDENCE: f64 = 0.5;
    /// Confidence floor
    pub const MIN_CONFIDENCE: f64 = 0.3;
    /// Confidence cap
    pub const MAX_CONFIDENCE: f64 = 0.95;
    /// Energy below this is a challenge period
    pub const CHALLENGE_BELOW: f64 = -40.0;
    /// Energy above this is an opportunity period
    pub const OPPORTUNITY_ABOVE: f64 = 80.0;
    /// Day-over-day change above this is a transition
    pub const TRANSITION_DELTA: f64 = 50.0;
    /// Sub-cycle below this is out of its comfortable range
    pub const CYCLE_RANGE_LOW: f64 = -30.0;
    /// Sub-cycle above this is out of its comfortable range
    pub const CYCLE_RANGE_HIGH: f64 = 80.0;
    /// Out-of-range sub-cycles needed for a multi-cycle transition
    pub const MIN_OUT_OF_RANGE_CYCLES: usize = 2;
    /// Sub-cycle above this yields a "use it" action
    pub const ACTION_HIGH: f64 = 60.0;
    /// Sub-cycle below this yields a "protect it" action
    pub const ACTION_LOW: f64 = -40.0;
    /// Slope magnitude needed for a weekly trend action
    pub const WEEKLY_TREND_SLOPE: f64 = 5.0;
    /// Maximum optimal actions
    pub const MAX_OPTIMAL_ACTIONS: usize = 6;
}

/// Weekly synthesis heuristics
pub mod weekly {
    /// Low-energy days needed for a challenge entry
    pub const LOW_DAYS_FOR_CHALLENGE: usize = 3;
    /// High-energy days needed for an opportunity entry
    pub const HIGH_DAYS_FOR_OPPORTUNITY: usize = 2;
    /// Volatile days needed for a challenge entry
    pub const VOLATILE_DAYS_FOR_CHALLENGE: usize = 2;
    /// Maximum challenges and opportunities each
    pub const MAX_ENTRIES: usize = 3;
    /// Maximum key transitions
    pub const MAX_TRANSITIONS: usize = 5;
    /// Themes considered for the weekly theme label
    pub const THEME_LABEL_CANDIDATES: usize = 3;
}
