//! Shared data models for the LeafScan backend.
//!
//! This crate provides Serde-serializable types for:
//! - Crop profiles (model artifact, class labels, input requirements)
//! - Classification requests and predictions

pub mod prediction;
pub mod profile;

// Re-export common types
pub use prediction::{Prediction, PredictionRequest};
pub use profile::{builtin_profiles, canonical_crop_key, CropProfile, PixelScale};
