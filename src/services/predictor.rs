use crate::{
    error::AppResult,
    ml::{ClusterModel, FeatureScaler},
    models::ClusterId,
};

use super::query_builder::FeatureRow;

/// Scales a feature row and asks the clustering model for its label
pub fn predict_cluster(
    scaler: &dyn FeatureScaler,
    model: &dyn ClusterModel,
    row: &FeatureRow,
) -> AppResult<ClusterId> {
    let scaled = scaler.transform(&row.values)?;
    let label = model.predict(&scaled)?;
    tracing::debug!(cluster = label, "Cluster predicted");
    Ok(label)
}
