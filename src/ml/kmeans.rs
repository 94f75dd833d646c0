//! K-means inference.
//!
//! Training happens offline; only the fitted cluster centers are loaded here.

use super::ClusterModel;
use crate::{
    error::{AppError, AppResult},
    models::ClusterId,
};

/// Assigns a row to the closest fitted cluster center.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestCentroid {
    centers: Vec<Vec<f64>>,
    n_features: usize,
}

impl NearestCentroid {
    /// Creates the model from cluster centers that all share one dimensionality
    pub fn new(centers: Vec<Vec<f64>>) -> AppResult<Self> {
        let n_features = centers
            .first()
            .map(Vec::len)
            .ok_or_else(|| AppError::Artifact("clustering model has no centers".to_string()))?;

        if n_features == 0 {
            return Err(AppError::Artifact(
                "cluster centers have no features".to_string(),
            ));
        }

        for (idx, center) in centers.iter().enumerate() {
            if center.len() != n_features {
                return Err(AppError::Artifact(format!(
                    "cluster center {idx} has {} features, expected {n_features}",
                    center.len()
                )));
            }
            if center.iter().any(|v| !v.is_finite()) {
                return Err(AppError::Artifact(format!(
                    "cluster center {idx} contains non-finite values"
                )));
            }
        }

        Ok(Self {
            centers,
            n_features,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl ClusterModel for NearestCentroid {
    fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    fn predict(&self, row: &[f64]) -> AppResult<ClusterId> {
        if row.len() != self.n_features {
            return Err(AppError::Prediction(format!(
                "model expects {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (idx, center) in self.centers.iter().enumerate() {
            let distance = squared_distance(row, center);
            // strict comparison: ties keep the lower index
            if distance < best_distance {
                best = idx;
                best_distance = distance;
            }
        }

        ClusterId::try_from(best)
            .map_err(|_| AppError::Prediction(format!("cluster index {best} out of range")))
    }
}
