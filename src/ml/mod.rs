use crate::{error::AppResult, models::ClusterId};

pub mod artifacts;
pub mod kmeans;
pub mod scaler;

pub use artifacts::{load_models, EncoderArtifact, ModelBundle};
pub use kmeans::NearestCentroid;
pub use scaler::StandardScaler;

/// Numeric transform fitted alongside the clustering model
#[cfg_attr(test, mockall::automock)]
pub trait FeatureScaler: Send + Sync {
    /// Number of features the transform expects
    fn n_features(&self) -> usize;

    /// Scales one feature row
    fn transform(&self, row: &[f64]) -> AppResult<Vec<f64>>;
}

/// Pre-trained clustering model
#[cfg_attr(test, mockall::automock)]
pub trait ClusterModel: Send + Sync {
    /// Number of clusters the model was fitted with
    fn n_clusters(&self) -> usize;

    /// Assigns a cluster to one scaled feature row
    fn predict(&self, row: &[f64]) -> AppResult<ClusterId>;
}
