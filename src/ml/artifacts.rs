//! Model artifact loading.
//!
//! Three JSON artifacts are produced by the offline training job: the encoder's
//! output column list, the fitted scaler and the fitted cluster centers. They are
//! validated against one [`FeatureSchema`] when loaded, so queries never have to.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{ClusterModel, FeatureScaler, NearestCentroid, StandardScaler};
use crate::{
    config::Config,
    data::source,
    error::{AppError, AppResult},
    models::{schema::CITY_PREFIX, FeatureSchema},
};

/// Categorical encoder output columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncoderArtifact {
    pub columns: Vec<String>,
}

impl EncoderArtifact {
    /// Cities the encoder was fitted on, sorted and distinct
    pub fn cities(&self) -> Vec<String> {
        city_names(&self.columns)
    }
}

/// Extracts the city names from `city_*` columns
pub fn city_names<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .filter_map(|col| col.as_ref().strip_prefix(CITY_PREFIX))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Fitted scaler as written by the training job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalerArtifact {
    pub schema_version: u32,
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Fitted clustering model as written by the training job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterModelArtifact {
    pub schema_version: u32,
    pub cluster_centers: Vec<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Validated scaler, clustering model and the schema they share
pub struct ModelBundle {
    pub schema: FeatureSchema,
    pub scaler: Box<dyn FeatureScaler>,
    pub model: Box<dyn ClusterModel>,
    pub cities: Vec<String>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("schema_version", &self.schema.version())
            .field("features", &self.schema.len())
            .field("clusters", &self.model.n_clusters())
            .field("cities", &self.cities.len())
            .finish()
    }
}

impl ModelBundle {
    /// Checks the artifacts against each other and builds the bundle
    pub fn from_artifacts(
        encoder: EncoderArtifact,
        scaler: ScalerArtifact,
        model: ClusterModelArtifact,
    ) -> AppResult<Self> {
        if scaler.schema_version != model.schema_version {
            return Err(AppError::Artifact(format!(
                "scaler schema version {} does not match model schema version {}",
                scaler.schema_version, model.schema_version
            )));
        }

        let schema = FeatureSchema::new(scaler.schema_version, scaler.feature_names)?;

        if scaler.mean.len() != schema.len() {
            return Err(AppError::Artifact(format!(
                "scaler has {} features but {} means",
                schema.len(),
                scaler.mean.len()
            )));
        }
        let fitted_scaler = StandardScaler::new(scaler.mean, scaler.scale)?;

        if let Some(names) = &model.feature_names {
            if names.as_slice() != schema.columns() {
                return Err(AppError::Artifact(
                    "model feature names differ from scaler feature names".to_string(),
                ));
            }
        }

        let fitted_model = NearestCentroid::new(model.cluster_centers)?;
        if fitted_model.n_features() != schema.len() {
            return Err(AppError::Artifact(format!(
                "cluster centers have {} features but the schema has {}",
                fitted_model.n_features(),
                schema.len()
            )));
        }

        let cities = encoder.cities();
        if cities.is_empty() {
            tracing::warn!("Encoder artifact has no city columns");
        }

        Ok(Self {
            schema,
            scaler: Box::new(fitted_scaler),
            model: Box::new(fitted_model),
            cities,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Warns when the encoded training table names different cities than the encoder
fn check_encoded_header(path: &Path, cities: &[String]) -> AppResult<()> {
    let header = source::read_header(path)?;
    let encoded_cities = city_names(&header);

    if encoded_cities != cities {
        let missing: Vec<&String> = cities.iter().filter(|c| !encoded_cities.contains(*c)).collect();
        let extra: Vec<&String> = encoded_cities.iter().filter(|c| !cities.contains(*c)).collect();
        tracing::warn!(
            path = %path.display(),
            missing = ?missing,
            extra = ?extra,
            "Encoded table cities differ from encoder artifact"
        );
    }
    Ok(())
}

/// Loads and validates the encoder, scaler and clustering model
pub fn load_models(config: &Config) -> AppResult<ModelBundle> {
    let start = Instant::now();

    let encoder: EncoderArtifact = read_json(&config.encoder_path)?;
    let scaler: ScalerArtifact = read_json(&config.scaler_path)?;
    let model: ClusterModelArtifact = read_json(&config.model_path)?;

    let bundle = ModelBundle::from_artifacts(encoder, scaler, model)?;

    if let Some(path) = config.encoded_data_path() {
        check_encoded_header(path, &bundle.cities)?;
    }

    tracing::info!(
        schema_version = bundle.schema.version(),
        features = bundle.schema.len(),
        clusters = bundle.model.n_clusters(),
        cities = bundle.cities.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Model artifacts loaded"
    );

    Ok(bundle)
}
