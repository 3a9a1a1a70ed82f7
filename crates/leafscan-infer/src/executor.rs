//! Forward-pass execution and reduction to a single prediction.

use ndarray::Array4;

use leafscan_models::{CropProfile, Prediction};

use crate::backend::ModelBackend;
use crate::error::{InferError, InferResult};

/// Per-class probabilities aligned index-for-index with a profile's class
/// labels. Always sums to 1 within floating tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDistribution(Vec<f32>);

impl ClassDistribution {
    /// Accept an already-normalized distribution as-is; anything else is
    /// treated as logits and softmaxed. Covers models exported with the
    /// final activation folded out of the graph.
    fn from_raw(values: Vec<f32>) -> Self {
        let sum: f32 = values.iter().sum();
        let in_range = values.iter().all(|&v| (0.0..=1.0).contains(&v));
        if in_range && (sum - 1.0).abs() <= 1e-3 {
            Self(values)
        } else {
            Self(softmax(&values))
        }
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.0
    }

    /// Index of the highest probability.
    ///
    /// Ties resolve to the lowest index (first strict maximum), so
    /// borderline cases reproduce across runs.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        let mut best_value = f32::NEG_INFINITY;
        for (index, &p) in self.0.iter().enumerate() {
            if p > best_value {
                best_value = p;
                best = index;
            }
        }
        best
    }
}

/// Numerically stable softmax.
fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Run one forward pass and validate the output into a distribution.
///
/// Any backend failure, an output vector whose length does not match the
/// profile's class count, or non-finite values surface as
/// [`InferError::Inference`]; there is no fallback prediction.
pub fn infer(
    backend: &dyn ModelBackend,
    profile: &CropProfile,
    input: Array4<f32>,
) -> InferResult<ClassDistribution> {
    let raw = backend.forward(input)?;

    if raw.len() != profile.num_classes() {
        return Err(InferError::inference(format!(
            "model produced {} outputs for {} classes",
            raw.len(),
            profile.num_classes()
        )));
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(InferError::inference("model produced non-finite output"));
    }

    Ok(ClassDistribution::from_raw(raw))
}

/// Reduce a distribution to the top-class prediction for a profile.
pub fn reduce(profile: &CropProfile, distribution: &ClassDistribution) -> InferResult<Prediction> {
    let index = distribution.argmax();
    let label = profile.label(index).ok_or_else(|| {
        InferError::inference(format!("winning index {index} has no label"))
    })?;

    Ok(Prediction {
        crop_key: profile.crop_key.clone(),
        predicted_label: label.to_string(),
        confidence: distribution.probabilities()[index] * 100.0,
    })
}
