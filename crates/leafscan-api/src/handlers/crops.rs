//! Crop discovery endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// One available crop.
#[derive(Serialize)]
pub struct CropInfo {
    pub crop: String,
    pub classes: Vec<String>,
    pub input_resolution: u32,
}

/// One crop skipped at startup.
#[derive(Serialize)]
pub struct SkippedCropInfo {
    pub crop: String,
    pub reason: String,
}

/// Crop listing response.
#[derive(Serialize)]
pub struct CropsResponse {
    pub crops: Vec<CropInfo>,
    pub skipped: Vec<SkippedCropInfo>,
}

/// List the crops this process can classify, plus the ones whose model
/// artifact was unavailable at startup.
pub async fn list_crops(State(state): State<AppState>) -> Json<CropsResponse> {
    let crops = state
        .registry
        .available()
        .into_iter()
        .map(|profile| CropInfo {
            crop: profile.crop_key.clone(),
            classes: profile.class_labels.clone(),
            input_resolution: profile.input_resolution,
        })
        .collect();

    let skipped = state
        .registry
        .skipped()
        .iter()
        .map(|s| SkippedCropInfo {
            crop: s.crop_key.clone(),
            reason: s.reason.clone(),
        })
        .collect();

    Json(CropsResponse { crops, skipped })
}
