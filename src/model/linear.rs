use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use super::Regressor;

/// `intercept + Σ coefficients[i] · x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.coefficients.len() == self.feature_names.len(),
            "{} coefficients for {} features",
            self.coefficients.len(),
            self.feature_names.len()
        );
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
