//! Classification endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use leafscan_models::{Prediction, PredictionRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Success body of the request/response contract.
#[derive(Serialize)]
pub struct PredictResponse {
    pub crop: String,
    pub predicted_class: String,
    /// Two-decimal percentage, e.g. "92.35%".
    pub confidence: String,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            confidence: prediction.confidence_display(),
            crop: prediction.crop_key,
            predicted_class: prediction.predicted_label,
        }
    }
}

/// Classify one uploaded image for one crop.
///
/// Multipart form with a `crop` text field and a `file` binary field.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<PredictResponse>> {
    let mut crop: Option<String> = None;
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart payload: {e}")))?
    {
        match field.name() {
            Some("crop") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid 'crop' field: {e}")))?;
                crop = Some(value);
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid 'file' field: {e}")))?;
                file = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let crop = crop.ok_or_else(|| ApiError::bad_request("missing 'crop' field"))?;
    let file = file.ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;

    match state
        .pipeline
        .classify(PredictionRequest::new(crop.clone(), file))
        .await
    {
        Ok(prediction) => {
            info!(
                crop = %prediction.crop_key,
                predicted = %prediction.predicted_label,
                confidence = prediction.confidence,
                "prediction completed"
            );
            Ok(Json(PredictResponse::from(prediction)))
        }
        Err(e) => {
            warn!(crop = %crop, error = %e, "prediction failed");
            Err(e.into())
        }
    }
}
