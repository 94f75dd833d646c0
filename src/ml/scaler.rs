use serde::{Deserialize, Serialize};

use super::FeatureScaler;
use crate::error::{AppError, AppResult};

/// Standardization fitted offline: `z = (x - mean) / scale`.
///
/// A zero `scale` entry marks a constant feature and divides by one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Creates a scaler, checking that both vectors agree and are finite
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> AppResult<Self> {
        if mean.len() != scale.len() {
            return Err(AppError::Artifact(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(&scale).any(|v| !v.is_finite()) {
            return Err(AppError::Artifact(
                "scaler contains non-finite values".to_string(),
            ));
        }
        Ok(Self { mean, scale })
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> AppResult<Vec<f64>> {
        if row.len() != self.mean.len() {
            return Err(AppError::Prediction(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
