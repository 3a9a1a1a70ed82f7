//! Crop profiles: the static metadata binding a crop to its model artifact,
//! ordered class labels, and preprocessing requirements.
//!
//! The profile table is fixed at build time. Adding a crop means adding one
//! entry here plus dropping its model artifact into the model directory;
//! nothing inside the pipeline changes.

use serde::{Deserialize, Serialize};

/// Pixel intensity scale a model was trained on.
///
/// Different model exports expect different input scales, and feeding the
/// wrong one degrades predictions without any error. The scale therefore
/// lives on the profile, next to the model it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PixelScale {
    /// Raw intensities in [0, 255].
    #[default]
    ZeroTo255,
    /// Intensities divided by 255 into [0.0, 1.0].
    UnitInterval,
}

impl PixelScale {
    /// Map one 8-bit channel value onto this scale.
    pub fn apply(&self, value: u8) -> f32 {
        match self {
            PixelScale::ZeroTo255 => f32::from(value),
            PixelScale::UnitInterval => f32::from(value) / 255.0,
        }
    }
}

/// Static description of one supported crop.
///
/// Immutable after construction. `class_labels` order matches the model's
/// output positions and is never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    /// Unique lowercase canonical key ("corn", "potato", ...).
    pub crop_key: String,
    /// Ordered class labels; index = model output position.
    pub class_labels: Vec<String>,
    /// Square input side length in pixels.
    pub input_resolution: u32,
    /// Model artifact file name under the configured model directory.
    pub model_file: String,
    /// Input scale the model was trained on.
    pub pixel_scale: PixelScale,
}

impl CropProfile {
    pub fn new(
        crop_key: impl Into<String>,
        class_labels: &[&str],
        input_resolution: u32,
        model_file: impl Into<String>,
        pixel_scale: PixelScale,
    ) -> Self {
        Self {
            crop_key: crop_key.into(),
            class_labels: class_labels.iter().map(|s| (*s).to_string()).collect(),
            input_resolution,
            model_file: model_file.into(),
            pixel_scale,
        }
    }

    /// Number of output classes the model produces.
    pub fn num_classes(&self) -> usize {
        self.class_labels.len()
    }

    /// Label at a model output position, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.class_labels.get(index).map(String::as_str)
    }
}

/// Canonical form of a crop selector: trimmed and lowercased.
///
/// All lookups go through this, so "Corn", " corn " and "corn" resolve to
/// the same profile.
pub fn canonical_crop_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The built-in crop profile table.
///
/// All four models take 224x224 RGB input and were trained on raw [0, 255]
/// intensities.
pub fn builtin_profiles() -> Vec<CropProfile> {
    vec![
        CropProfile::new(
            "corn",
            &[
                "Common_Rust",
                "Gray_Leaf_Spot",
                "Healthy",
                "Northern_Leaf_Blight",
            ],
            224,
            "corn_disease_model.onnx",
            PixelScale::ZeroTo255,
        ),
        CropProfile::new(
            "potato",
            &["Early_Blight", "Healthy", "Late_Blight"],
            224,
            "potato_disease_model.onnx",
            PixelScale::ZeroTo255,
        ),
        CropProfile::new(
            "rice",
            &["Brown_Spot", "Healthy", "Leaf_Blast", "Neck_Blast"],
            224,
            "rice_disease_model.onnx",
            PixelScale::ZeroTo255,
        ),
        CropProfile::new(
            "wheat",
            &["Brown_Rust", "Healthy", "Yellow_Rust"],
            224,
            "wheat_disease_model.onnx",
            PixelScale::ZeroTo255,
        ),
    ]
}
