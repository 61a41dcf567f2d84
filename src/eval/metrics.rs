use std::fmt;

use log::warn;

use super::results::{PredictionRow, ResultSet, check_row_counts};
use crate::error::EvalResult;

/// Aggregate regression error over the full result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// mean((actual - predicted)^2)
    pub mse: f64,
    /// sqrt(mse)
    pub rmse: f64,
    /// mean(|actual - predicted|)
    pub mae: f64,
}

impl Metrics {
    /// An empty input yields NaN for every metric.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> EvalResult<Self> {
        check_row_counts(predicted.len(), actual.len())?;
        if actual.is_empty() {
            warn!("no rows to evaluate; metrics are undefined");
        }

        let n = actual.len() as f64;
        let (sum_sq, sum_abs) = actual
            .iter()
            .zip(predicted)
            .fold((0.0, 0.0), |(sq, abs), (&a, &p)| {
                let d = a - p;
                (sq + d * d, abs + d.abs())
            });

        let mse = sum_sq / n;
        Ok(Metrics {
            mse,
            rmse: mse.sqrt(),
            mae: sum_abs / n,
        })
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean Squared Error (MSE):       {:.2}", self.mse)?;
        writeln!(f, "Root Mean Squared Error (RMSE): {:.2}", self.rmse)?;
        write!(f, "Mean Absolute Error (MAE):      {:.2}", self.mae)
    }
}

/// Means over every row (not just the ranked ones).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean_actual: f64,
    pub mean_predicted: f64,
    pub mean_abs_error: f64,
    pub mean_abs_percentage_error: f64,
}

impl Summary {
    /// Plain means: a NaN or infinite row value carries into the mean.
    ///
    /// A row with actual and predicted both 0 has a NaN percentage error,
    /// which makes `mean_abs_percentage_error` NaN rather than being skipped.
    pub fn compute(results: &ResultSet) -> Self {
        let n = results.len() as f64;
        let mean = |f: fn(&PredictionRow) -> f64| {
            results.rows.iter().map(f).sum::<f64>() / n
        };
        Summary {
            mean_actual: mean(|r| r.actual),
            mean_predicted: mean(|r| r.predicted),
            mean_abs_error: mean(|r| r.difference.abs()),
            mean_abs_percentage_error: mean(|r| r.percentage_error.abs()),
        }
    }
}
