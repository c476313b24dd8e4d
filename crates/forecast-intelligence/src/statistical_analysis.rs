// ABOUTME: Least-squares linear regression over evenly spaced energy values
// ABOUTME: Slope and R-squared drive both trend labels and analyzer confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Linear regression results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Change per step
    pub slope: f64,
    /// Value at step zero
    pub intercept: f64,
    /// Coefficient of determination (0-1)
    pub r_squared: f64,
    /// Pearson correlation (-1 to 1)
    pub correlation: f64,
}

/// Regression over values observed at x = 0, 1, 2, ...
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Ordinary least squares fit
    ///
    /// # Errors
    ///
    /// Returns an error with fewer than two values
    pub fn linear_regression(values: &[f64]) -> AppResult<RegressionResult> {
        if values.len() < 2 {
            return Err(AppError::invalid_input(format!(
                "Insufficient data points for regression: need at least 2, got {}",
                values.len()
            )));
        }

        let n = values.len() as f64;
        let xs = (0..values.len()).map(|i| i as f64);

        let sum_x: f64 = xs.clone().sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xx: f64 = xs.clone().map(|x| x * x).sum();
        let sum_xy: f64 = xs.zip(values).map(|(x, y)| x * y).sum();
        let sum_yy: f64 = values.iter().map(|y| y * y).sum();

        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let var_x = (n * mean_x).mul_add(-mean_x, sum_xx);
        let var_y = (n * mean_y).mul_add(-mean_y, sum_yy);
        let covariance = (n * mean_x).mul_add(-mean_y, sum_xy);

        let slope = covariance / var_x;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let denominator = (var_x * var_y).sqrt();
        let correlation = if denominator.abs() < f64::EPSILON {
            0.0
        } else {
            (covariance / denominator).clamp(-1.0, 1.0)
        };

        Ok(RegressionResult {
            slope,
            intercept,
            r_squared: correlation * correlation,
            correlation,
        })
    }

    /// Largest absolute step between consecutive values
    #[must_use]
    pub fn max_step(values: &[f64]) -> f64 {
        values
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0, f64::max)
    }
}
