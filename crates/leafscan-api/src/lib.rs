//! Axum HTTP API server.
//!
//! This crate provides:
//! - The `/predict` classification endpoint
//! - Crop discovery and health/readiness probes
//! - HTTP mapping of pipeline errors

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
