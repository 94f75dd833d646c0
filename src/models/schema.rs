use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Schema versions this build can read
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Prefix of the one-hot city indicator columns
pub const CITY_PREFIX: &str = "city_";
/// Prefix of the one-hot cuisine indicator columns
pub const CUISINE_PREFIX: &str = "cuisine_";

/// Ordered feature columns shared by the scaler and the clustering model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureSchema {
    version: u32,
    columns: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Builds a schema, rejecting unsupported versions, empty lists and duplicate names
    pub fn new(version: u32, columns: Vec<String>) -> AppResult<Self> {
        if version != SUPPORTED_SCHEMA_VERSION {
            return Err(AppError::Artifact(format!(
                "unsupported schema version {version} (expected {SUPPORTED_SCHEMA_VERSION})"
            )));
        }
        if columns.is_empty() {
            return Err(AppError::Artifact(
                "feature schema has no columns".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(AppError::Artifact(format!(
                    "duplicate feature column '{name}'"
                )));
            }
        }

        Ok(Self {
            version,
            columns,
            index,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if the schema has it
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Position of the `city_<city>` indicator
    pub fn city_indicator(&self, city: &str) -> Option<usize> {
        self.position(&format!("{CITY_PREFIX}{city}"))
    }

    /// Position of the `cuisine_<cuisine>` indicator
    pub fn cuisine_indicator(&self, cuisine: &str) -> Option<usize> {
        self.position(&format!("{CUISINE_PREFIX}{cuisine}"))
    }
}
