//! Classification request and prediction types.
//!
//! Both are request-scoped: created per request, discarded once the caller
//! has consumed them. Nothing here is ever persisted.

use serde::{Deserialize, Serialize};

/// Raw classification input as received from the caller.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    /// Crop selector, matched case-insensitively against the profile table.
    pub crop: String,
    /// Encoded image payload in any supported raster format.
    pub image_bytes: Vec<u8>,
}

impl PredictionRequest {
    pub fn new(crop: impl Into<String>, image_bytes: Vec<u8>) -> Self {
        Self {
            crop: crop.into(),
            image_bytes,
        }
    }
}

/// A single top-class prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Canonical key of the crop the prediction was made for.
    pub crop_key: String,
    /// Winning class label; always a member of the profile's label list.
    pub predicted_label: String,
    /// Maximum class probability as a percentage in [0, 100].
    pub confidence: f32,
}

impl Prediction {
    /// Two-decimal percent rendering used by the HTTP contract, e.g. "92.35%".
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_display() {
        let prediction = Prediction {
            crop_key: "potato".to_string(),
            predicted_label: "Late_Blight".to_string(),
            confidence: 92.3456,
        };
        assert_eq!(prediction.confidence_display(), "92.35%");
    }

    #[test]
    fn test_confidence_display_bounds() {
        let mut prediction = Prediction {
            crop_key: "corn".to_string(),
            predicted_label: "Healthy".to_string(),
            confidence: 100.0,
        };
        assert_eq!(prediction.confidence_display(), "100.00%");

        prediction.confidence = 0.0;
        assert_eq!(prediction.confidence_display(), "0.00%");
    }

    #[test]
    fn test_prediction_serializes_confidence_as_number() {
        let prediction = Prediction {
            crop_key: "rice".to_string(),
            predicted_label: "Brown_Spot".to_string(),
            confidence: 51.5,
        };
        let value = serde_json::to_value(&prediction).unwrap();
        assert_eq!(value["predicted_label"], "Brown_Spot");
        assert!(value["confidence"].is_number());
    }
}
