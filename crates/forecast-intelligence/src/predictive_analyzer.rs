// ABOUTME: Predictive analysis over the numeric cycle series
// ABOUTME: Trend regression, critical-period detection, and per-cycle optimal actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::energy::predictive::{
    ACTION_HIGH, ACTION_LOW, CHALLENGE_BELOW, CYCLE_RANGE_HIGH, CYCLE_RANGE_LOW, MAX_CONFIDENCE,
    MAX_OPTIMAL_ACTIONS, MIN_CONFIDENCE, MIN_OUT_OF_RANGE_CYCLES, MIN_TREND_POINTS,
    NEUTRAL_CONFIDENCE, OPPORTUNITY_ABOVE, TRANSITION_DELTA, TREND_SLOPE_THRESHOLD, TREND_WINDOW,
    WEEKLY_TREND_SLOPE,
};
use crate::cycles::{NumericReading, SeriesPoint, EMOTIONAL_WINDOW, INTELLECTUAL_WINDOW, PHYSICAL_WINDOW};
use crate::models::{
    CriticalPeriod, CriticalPeriodType, CycleValues, OptimalAction, PredictiveInsights,
    TrendAnalysis, TrendDirection,
};
use crate::statistical_analysis::StatisticalAnalyzer;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// Stateless analyzer; thresholds come from `constants::energy::predictive`
pub struct PredictiveAnalyzer;

impl PredictiveAnalyzer {
    /// Full predictive section for a numeric reading
    #[must_use]
    pub fn analyze(reading: &NumericReading) -> PredictiveInsights {
        let series = reading.analysis_series();
        let values: Vec<f64> = series.iter().map(|p| p.energy).collect();
        let trend_analysis = Self::analyze_trend(&values);
        let critical_periods = Self::detect_critical_periods(&series, &reading.critical_days);
        let optimal_actions = Self::optimal_actions(&reading.cycles, &trend_analysis);
        PredictiveInsights {
            trend_analysis,
            critical_periods,
            optimal_actions,
        }
    }

    /// OLS trend over the first `TREND_WINDOW` values
    #[must_use]
    pub fn analyze_trend(values: &[f64]) -> TrendAnalysis {
        let window = &values[..values.len().min(TREND_WINDOW)];
        let timeframe = format!("{} days", window.len());

        if window.len() < MIN_TREND_POINTS {
            return TrendAnalysis {
                direction: TrendDirection::Stable,
                confidence: NEUTRAL_CONFIDENCE,
                timeframe,
                slope: 0.0,
                r_squared: 0.0,
            };
        }

        let Ok(fit) = StatisticalAnalyzer::linear_regression(window) else {
            return TrendAnalysis {
                direction: TrendDirection::Stable,
                confidence: NEUTRAL_CONFIDENCE,
                timeframe,
                slope: 0.0,
                r_squared: 0.0,
            };
        };

        let direction = if fit.slope > TREND_SLOPE_THRESHOLD {
            TrendDirection::Improving
        } else if fit.slope < -TREND_SLOPE_THRESHOLD {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        TrendAnalysis {
            direction,
            confidence: fit.r_squared.mul_add(0.8, 0.2).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            timeframe,
            slope: fit.slope,
            r_squared: fit.r_squared,
        }
    }

    /// Flag challenge, opportunity and transition dates, merged with known
    /// critical dates and returned in ascending date order
    #[must_use]
    pub fn detect_critical_periods(
        series: &[SeriesPoint],
        known_critical: &BTreeSet<NaiveDate>,
    ) -> Vec<CriticalPeriod> {
        let mut periods = Vec::new();

        for (index, point) in series.iter().enumerate() {
            if point.energy < CHALLENGE_BELOW {
                periods.push(CriticalPeriod {
                    date: point.date,
                    period_type: CriticalPeriodType::Challenge,
                    description: format!(
                        "Energy drops to {:.0}%: keep commitments light",
                        point.energy
                    ),
                });
            } else if point.energy > OPPORTUNITY_ABOVE {
                periods.push(CriticalPeriod {
                    date: point.date,
                    period_type: CriticalPeriodType::Opportunity,
                    description: format!(
                        "Energy peaks at {:.0}%: good day for ambitious work",
                        point.energy
                    ),
                });
            }

            if let Some(previous) = index.checked_sub(1).and_then(|i| series.get(i)) {
                let delta = point.energy - previous.energy;
                if delta.abs() > TRANSITION_DELTA {
                    periods.push(CriticalPeriod {
                        date: point.date,
                        period_type: CriticalPeriodType::Transition,
                        description: format!(
                            "Sharp energy {} of {:.0} points",
                            if delta > 0.0 { "rise" } else { "drop" },
                            delta.abs()
                        ),
                    });
                }
            }

            let out_of_range: Vec<&str> = point
                .cycles
                .named()
                .into_iter()
                .filter(|(_, v)| *v < CYCLE_RANGE_LOW || *v > CYCLE_RANGE_HIGH)
                .map(|(name, _)| name)
                .collect();
            if out_of_range.len() >= MIN_OUT_OF_RANGE_CYCLES {
                periods.push(CriticalPeriod {
                    date: point.date,
                    period_type: CriticalPeriodType::Transition,
                    description: format!("Multiple cycles at extremes ({})", out_of_range.join(", ")),
                });
            }
        }

        let flagged: HashSet<NaiveDate> = periods.iter().map(|p| p.date).collect();
        periods.extend(
            known_critical
                .iter()
                .filter(|date| !flagged.contains(date))
                .map(|date| CriticalPeriod {
                    date: *date,
                    period_type: CriticalPeriodType::Transition,
                    description: "Biorhythm critical day: a cycle crosses zero".to_owned(),
                }),
        );

        periods.sort_by_key(|p| p.date);
        periods
    }

    /// Per-cycle rules in fixed order (physical, emotional, intellectual), then the weekly trend
    #[must_use]
    pub fn optimal_actions(cycles: &CycleValues, trend: &TrendAnalysis) -> Vec<OptimalAction> {
        let mut actions = Vec::new();

        if let Some(physical) = cycles.physical {
            if physical > ACTION_HIGH {
                actions.push(OptimalAction {
                    timing: format!("Morning ({PHYSICAL_WINDOW})"),
                    action: "Schedule demanding physical activity or training".to_owned(),
                    reasoning: format!("Physical cycle at {physical:.0}% supports strength and stamina"),
                });
            } else if physical < ACTION_LOW {
                actions.push(OptimalAction {
                    timing: "Throughout the day".to_owned(),
                    action: "Favor rest, stretching and light movement".to_owned(),
                    reasoning: format!("Physical cycle at {physical:.0}% signals reduced stamina"),
                });
            }
        }

        if let Some(emotional) = cycles.emotional {
            if emotional > ACTION_HIGH {
                actions.push(OptimalAction {
                    timing: format!("Afternoon ({EMOTIONAL_WINDOW})"),
                    action: "Hold important conversations and collaborative sessions".to_owned(),
                    reasoning: format!("Emotional cycle at {emotional:.0}% favors connection"),
                });
            } else if emotional < ACTION_LOW {
                actions.push(OptimalAction {
                    timing: "Evening".to_owned(),
                    action: "Protect quiet time and postpone difficult discussions".to_owned(),
                    reasoning: format!("Emotional cycle at {emotional:.0}% lowers resilience"),
                });
            }
        }

        if let Some(intellectual) = cycles.intellectual {
            if intellectual > ACTION_HIGH {
                actions.push(OptimalAction {
                    timing: format!("Late morning ({INTELLECTUAL_WINDOW})"),
                    action: "Tackle complex problem solving, planning and learning".to_owned(),
                    reasoning: format!("Intellectual cycle at {intellectual:.0}% sharpens focus"),
                });
            } else if intellectual < ACTION_LOW {
                actions.push(OptimalAction {
                    timing: "Throughout the day".to_owned(),
                    action: "Stick to routine tasks and double-check important decisions".to_owned(),
                    reasoning: format!("Intellectual cycle at {intellectual:.0}% dulls concentration"),
                });
            }
        }

        if trend.slope > WEEKLY_TREND_SLOPE {
            actions.push(OptimalAction {
                timing: "This week".to_owned(),
                action: "Place key initiatives later in the week as energy builds".to_owned(),
                reasoning: format!("Energy rising about {:.1} points per day", trend.slope),
            });
        } else if trend.slope < -WEEKLY_TREND_SLOPE {
            actions.push(OptimalAction {
                timing: "This week".to_owned(),
                action: "Front-load important work and plan recovery toward the weekend".to_owned(),
                reasoning: format!("Energy falling about {:.1} points per day", trend.slope.abs()),
            });
        }

        actions.truncate(MAX_OPTIMAL_ACTIONS);
        actions
    }
}
