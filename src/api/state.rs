use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    config::Config,
    data::{self, Catalog},
    error::{AppError, AppResult},
    ml::{self, ModelBundle},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Configuration plus the lazily loaded, read-only dataset and models
pub struct AppStateInner {
    pub config: Config,
    catalog: OnceCell<Arc<Catalog>>,
    models: OnceCell<Arc<ModelBundle>>,
}

impl AppState {
    /// Creates a state that loads its data on first use
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: OnceCell::new(),
                models: OnceCell::new(),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The dataset, loading it once per process.
    ///
    /// A failed load is returned to the caller and attempted again on the next call.
    pub async fn catalog(&self) -> AppResult<Arc<Catalog>> {
        self.inner
            .catalog
            .get_or_try_init(|| {
                let config = self.inner.config.clone();
                run_blocking(move || data::load_catalog(&config).map(Arc::new))
            })
            .await
            .cloned()
    }

    /// The model artifacts, loading them once per process
    pub async fn models(&self) -> AppResult<Arc<ModelBundle>> {
        self.inner
            .models
            .get_or_try_init(|| {
                let config = self.inner.config.clone();
                run_blocking(move || ml::load_models(&config).map(Arc::new))
            })
            .await
            .cloned()
    }

    /// Loads both the dataset and the models
    pub async fn warm(&self) -> AppResult<()> {
        self.catalog().await?;
        self.models().await?;
        Ok(())
    }
}

async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal(format!("loader task failed: {e}")))?
}
