//! Request orchestration.
//!
//! Drives one classification request through crop resolution, image
//! normalization and a bounded forward pass. Stateless across requests;
//! every path ends in exactly one terminal outcome and nothing is retried
//! here.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use leafscan_models::{Prediction, PredictionRequest};

use crate::error::{InferError, InferResult};
use crate::executor;
use crate::normalize;
use crate::registry::ModelRegistry;

/// Default bound on a single forward pass.
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(15);

/// Stateless per-request classification pipeline over an immutable registry.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<ModelRegistry>,
    inference_timeout: Duration,
}

impl Pipeline {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Classify one image for one crop.
    ///
    /// Decode/resize and the forward pass run on blocking workers; only the
    /// forward pass is bounded by the inference timeout. The caller decides
    /// whether to retry with new input.
    pub async fn classify(&self, request: PredictionRequest) -> InferResult<Prediction> {
        let model = self
            .registry
            .resolve(&request.crop)
            .ok_or_else(|| InferError::unknown_crop(request.crop.trim()))?;

        debug!(crop = %model.profile.crop_key, bytes = request.image_bytes.len(), "request resolved");

        // Decode and resize are CPU-bound; keep them off the async workers.
        let profile = model.profile.clone();
        let image_bytes = request.image_bytes;
        let input = tokio::task::spawn_blocking(move || normalize::normalize(&image_bytes, &profile))
            .await
            .map_err(|e| InferError::inference(format!("normalize task failed: {e}")))??;

        let infer_model = Arc::clone(&model);
        let forward = tokio::task::spawn_blocking(move || {
            let distribution =
                executor::infer(infer_model.backend(), &infer_model.profile, input)?;
            executor::reduce(&infer_model.profile, &distribution)
        });

        match tokio::time::timeout(self.inference_timeout, forward).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(InferError::inference(format!(
                "inference task failed: {join_error}"
            ))),
            Err(_) => Err(InferError::inference(format!(
                "inference timed out after {}ms",
                self.inference_timeout.as_millis()
            ))),
        }
    }
}
