//! API integration tests.
//!
//! The router is exercised end-to-end with `tower::ServiceExt::oneshot`;
//! model backends are stubbed so no ONNX artifacts are required.

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ndarray::Array4;
use tower::ServiceExt;

use leafscan_api::{create_router, ApiConfig, AppState};
use leafscan_infer::{CropModel, InferResult, ModelBackend, ModelRegistry};
use leafscan_models::{CropProfile, PixelScale};

struct FixedBackend(Vec<f32>);

impl ModelBackend for FixedBackend {
    fn forward(&self, _input: Array4<f32>) -> InferResult<Vec<f32>> {
        Ok(self.0.clone())
    }
}

fn potato_profile() -> CropProfile {
    CropProfile::new(
        "potato",
        &["Early_Blight", "Healthy", "Late_Blight"],
        32,
        "potato_disease_model.onnx",
        PixelScale::ZeroTo255,
    )
}

fn test_app() -> Router {
    let model = CropModel::new(potato_profile(), Box::new(FixedBackend(vec![0.02, 0.05, 0.93])));
    let registry = Arc::new(ModelRegistry::from_models(vec![model]));
    create_router(AppState::new(ApiConfig::default(), registry))
}

fn empty_app() -> Router {
    let registry = Arc::new(ModelRegistry::from_models(Vec::new()));
    create_router(AppState::new(ApiConfig::default(), registry))
}

fn leaf_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(48, 36, image::Rgb([52, 140, 48]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

const BOUNDARY: &str = "leafscan-test-boundary";

fn multipart_body(crop: Option<&str>, file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(crop) = crop {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"crop\"\r\n\r\n{crop}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"leaf.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn predict_request(uri: &str, crop: Option<&str>, file: Option<&[u8]>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(crop, file)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_predict_happy_path() {
    let png = leaf_png();
    let response = test_app()
        .oneshot(predict_request("/predict", Some("potato"), Some(&png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["crop"], "potato");
    assert_eq!(body["predicted_class"], "Late_Blight");
    assert_eq!(body["confidence"], "93.00%");
}

#[tokio::test]
async fn test_predict_trailing_slash_route() {
    let png = leaf_png();
    let response = test_app()
        .oneshot(predict_request("/predict/", Some("potato"), Some(&png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_crop_is_case_insensitive() {
    let png = leaf_png();
    let response = test_app()
        .oneshot(predict_request("/predict", Some("Potato"), Some(&png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["crop"], "potato");
}

#[tokio::test]
async fn test_predict_unknown_crop_is_not_found() {
    let png = leaf_png();
    let response = test_app()
        .oneshot(predict_request("/predict", Some("banana"), Some(&png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("banana"));
}

#[tokio::test]
async fn test_predict_non_image_payload_is_bad_request() {
    let blob = [0x07u8, 0x33, 0x91, 0x4c, 0x00, 0xfe, 0x12, 0x55, 0xaa, 0x01];
    let response = test_app()
        .oneshot(predict_request("/predict", Some("potato"), Some(&blob)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("decode"));
}

#[tokio::test]
async fn test_predict_missing_fields_are_bad_request() {
    let png = leaf_png();

    let response = test_app()
        .oneshot(predict_request("/predict", None, Some(&png)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_app()
        .oneshot(predict_request("/predict", Some("potato"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_crops_listing() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/crops")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["crops"][0]["crop"], "potato");
    assert_eq!(body["crops"][0]["input_resolution"], 32);
    assert_eq!(body["crops"][0]["classes"][2], "Late_Blight");
}

#[tokio::test]
async fn test_ready_reports_loaded_models() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["models_loaded"], 1);
}

#[tokio::test]
async fn test_ready_degraded_with_empty_registry() {
    let response = empty_app()
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_empty_registry_still_serves_predictions_as_not_found() {
    let png = leaf_png();
    let response = empty_app()
        .oneshot(predict_request("/predict", Some("potato"), Some(&png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
