//! Application state.

use std::sync::Arc;

use leafscan_infer::{ModelRegistry, Pipeline};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub registry: Arc<ModelRegistry>,
    pub pipeline: Pipeline,
}

impl AppState {
    /// Build state around an already-loaded registry.
    pub fn new(config: ApiConfig, registry: Arc<ModelRegistry>) -> Self {
        let pipeline = Pipeline::new(Arc::clone(&registry))
            .with_inference_timeout(config.inference_timeout);
        Self {
            config,
            registry,
            pipeline,
        }
    }
}
