//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use pictor_core::config::Config;
use pictor_moderation::Moderator;
use pictor_pipeline::ImagePipeline;
use pictor_storage::Storage;

/// Immutable per-process state. Cloning is cheap.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub pipeline: Arc<ImagePipeline>,
    /// Same handle the pipeline writes through; used for avatar reads.
    pub storage: Storage,
}

impl AppContext {
    pub fn new(config: Config, storage: Storage, moderator: Option<Arc<dyn Moderator>>) -> Self {
        let pipeline = ImagePipeline::new(storage.clone(), moderator);
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            storage,
        }
    }

    /// Build the object store and moderator described by `config`.
    pub async fn from_config(config: Config) -> pictor_core::Result<Self> {
        let storage = pictor_storage::from_config(&config.storage).await;

        let moderator = pictor_moderation::from_config(&config.moderation)
            .map_err(|e| pictor_core::Error::config(e.to_string()))?
            .map(|m| {
                tracing::info!(endpoint = m.endpoint(), "Content moderation enabled");
                Arc::new(m) as Arc<dyn Moderator>
            });

        Ok(Self::new(config, storage, moderator))
    }
}
