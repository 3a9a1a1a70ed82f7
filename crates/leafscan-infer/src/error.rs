//! Error types for the inference pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline operations.
pub type InferResult<T> = Result<T, InferError>;

/// Errors that can occur while classifying an image.
#[derive(Debug, Error)]
pub enum InferError {
    /// Crop key was never configured, or its model artifact was unavailable
    /// at startup.
    #[error("no model available for crop '{crop}'")]
    UnknownCrop { crop: String },

    /// Supplied bytes are not a supported raster image.
    #[error("could not decode image: {reason}")]
    Decode { reason: String },

    /// The forward pass failed, produced malformed output, or timed out.
    #[error("inference failed: {reason}")]
    Inference { reason: String },

    /// A model artifact could not be read or loaded. Only surfaces during
    /// registry construction, where it turns into a skip diagnostic.
    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
}

impl InferError {
    pub fn unknown_crop(crop: impl Into<String>) -> Self {
        Self::UnknownCrop { crop: crop.into() }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn inference(reason: impl Into<String>) -> Self {
        Self::Inference {
            reason: reason.into(),
        }
    }

    pub fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
