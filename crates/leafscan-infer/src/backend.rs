//! Model execution backends.
//!
//! The [`ModelBackend`] trait is the seam between the pipeline and the
//! runtime actually executing the forward pass. Production uses
//! [`OnnxModel`]; tests substitute canned backends.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::info;

use crate::error::{InferError, InferResult};

/// A loaded classifier that can run a forward pass.
///
/// Implementations must be safe for concurrent invocation and must not
/// mutate model state between calls: the same input always produces the
/// same output.
pub trait ModelBackend: Send + Sync {
    /// Run one forward pass over an NHWC `(1, H, W, 3)` batch and return
    /// the raw per-class output vector.
    fn forward(&self, input: Array4<f32>) -> InferResult<Vec<f32>>;
}

/// ONNX Runtime backed classifier.
///
/// `Session::run` takes `&mut self`, so every model guards its session with
/// its own `Mutex`. The lock is per model: concurrent requests for
/// different crops never contend.
#[derive(Debug)]
pub struct OnnxModel {
    name: String,
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxModel {
    /// Load an ONNX model from disk.
    ///
    /// Reads the artifact into memory and commits it to a new session with
    /// full graph optimization. Fails if the file is missing, unreadable,
    /// or not a valid model.
    pub fn load(name: impl Into<String>, path: &Path) -> InferResult<Self> {
        let name = name.into();

        let model_bytes =
            std::fs::read(path).map_err(|e| InferError::model_load(path, e.to_string()))?;

        let session = Session::builder()
            .map_err(|e| InferError::model_load(path, e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferError::model_load(path, e.to_string()))?
            .commit_from_memory(&model_bytes)
            .map_err(|e| InferError::model_load(path, e.to_string()))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| InferError::model_load(path, "model declares no outputs"))?;

        info!(
            model = %name,
            path = %path.display(),
            output = %output_name,
            "ONNX session initialized"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl ModelBackend for OnnxModel {
    fn forward(&self, input: Array4<f32>) -> InferResult<Vec<f32>> {
        let shape: Vec<usize> = input.shape().to_vec();
        let data = input.into_raw_vec().into_boxed_slice();

        let tensor: ort::value::DynValue = Tensor::from_array((shape, data))
            .map(Value::from)
            .map_err(|e| {
                InferError::inference(format!("failed to create input tensor: {e}"))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferError::inference("session lock poisoned"))?;

        let outputs = session.run(ort::inputs![tensor]).map_err(|e| {
            InferError::inference(format!("model '{}' forward pass failed: {e}", self.name))
        })?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferError::inference(format!(
                "model '{}' produced no '{}' tensor",
                self.name, self.output_name
            ))
        })?;

        let (_, values) = output.try_extract_tensor::<f32>().map_err(|e| {
            InferError::inference(format!("failed to extract output tensor: {e}"))
        })?;

        Ok(values.to_vec())
    }
}
