pub mod predictor;
pub mod query_builder;
pub mod recommendations;

pub use predictor::predict_cluster;
pub use query_builder::{build_feature_row, FeatureRow};
pub use recommendations::{filter_rank, recommend};
