use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cleaned restaurant records (name, city, cuisine, rating, rating_count, cost)
    #[serde(default = "default_cleaned_data_path")]
    pub cleaned_data_path: PathBuf,

    /// Per-row cluster assignments
    #[serde(default = "default_clustered_data_path")]
    pub clustered_data_path: PathBuf,

    /// One-hot encoded training table, only its header is read.
    /// An empty value skips the header check.
    #[serde(default = "default_encoded_data_path")]
    pub encoded_data_path: PathBuf,

    /// Encoder artifact (output column list)
    #[serde(default = "default_encoder_path")]
    pub encoder_path: PathBuf,

    /// Scaler artifact (feature schema, mean, scale)
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,

    /// Clustering model artifact (cluster centers)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Column used to join cluster assignments onto cleaned records when both files carry it
    #[serde(default = "default_join_key")]
    pub join_key: String,

    /// `rating_count` fed to the feature row when a request does not supply one
    #[serde(default = "default_rating_count")]
    pub default_rating_count: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cleaned_data_path() -> PathBuf {
    PathBuf::from("data/cleaned_data.csv")
}

fn default_clustered_data_path() -> PathBuf {
    PathBuf::from("data/clustered_data.csv")
}

fn default_encoded_data_path() -> PathBuf {
    PathBuf::from("data/encoded_data.csv")
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("data/encoder.json")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("data/scaler.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("data/kmeans_model.json")
}

fn default_join_key() -> String {
    "id".to_string()
}

fn default_rating_count() -> u32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cleaned_data_path: default_cleaned_data_path(),
            clustered_data_path: default_clustered_data_path(),
            encoded_data_path: default_encoded_data_path(),
            encoder_path: default_encoder_path(),
            scaler_path: default_scaler_path(),
            model_path: default_model_path(),
            join_key: default_join_key(),
            default_rating_count: default_rating_count(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Encoded-table path, if the header check is enabled
    pub fn encoded_data_path(&self) -> Option<&PathBuf> {
        if self.encoded_data_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.encoded_data_path)
        }
    }
}
