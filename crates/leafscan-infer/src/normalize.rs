//! Image decoding and tensor normalization.
//!
//! Turns arbitrary encoded image bytes into the fixed-size, fixed-channel
//! NHWC tensor a crop's model expects. Resizing uses a fixed filter so the
//! same input always yields the same tensor.

use image::imageops::FilterType;
use ndarray::Array4;

use leafscan_models::CropProfile;

use crate::error::{InferError, InferResult};

/// Decode raw image bytes into a model-ready `(1, R, R, 3)` tensor.
///
/// - decode with format guessing; unsupported bytes are a [`InferError::Decode`];
/// - convert to exactly 3 channels (alpha dropped, grayscale expanded);
/// - resize to the profile's square resolution, any input size or aspect ratio;
/// - scale intensities per the profile's pixel scale.
pub fn normalize(image_bytes: &[u8], profile: &CropProfile) -> InferResult<Array4<f32>> {
    let decoded =
        image::load_from_memory(image_bytes).map_err(|e| InferError::decode(e.to_string()))?;

    let side = profile.input_resolution;
    let resized = decoded.resize_exact(side, side, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let dim = side as usize;
    let mut tensor = Array4::<f32>::zeros((1, dim, dim, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] =
                profile.pixel_scale.apply(pixel[channel]);
        }
    }

    Ok(tensor)
}
