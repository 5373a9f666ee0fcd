//! Image resizing functions for preview generation.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{decode_bytes, DecodeError, DecodedImage, FilterType, PreviewBox};

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Interpolation filter to use
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if a target dimension is zero.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let downscaling = width <= image.width && height <= image.height;
    let resized = if filter == FilterType::Area && downscaling {
        image::imageops::thumbnail(&rgb_image, width, height)
    } else {
        image::imageops::resize(&rgb_image, width, height, filter.to_image_filter())
    };

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize an image to fit within a bounding box while preserving aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is ever upscaled.
/// Otherwise the scale is `min(max_width / width, max_height / height)` and
/// each output edge is the rounded scaled edge.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if the box has a zero edge.
pub fn resize_to_fit(
    image: &DecodedImage,
    bounds: PreviewBox,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if bounds.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: bounds.max_width,
            height: bounds.max_height,
        });
    }

    if bounds.contains(image.width, image.height) {
        return Ok(image.clone());
    }

    let (new_width, new_height) = fit_dimensions(image.width, image.height, bounds);

    resize(image, new_width, new_height, filter)
}

/// Generate a preview thumbnail using area averaging.
pub fn generate_preview(image: &DecodedImage, bounds: PreviewBox) -> Result<DecodedImage, DecodeError> {
    resize_to_fit(image, bounds, FilterType::Area)
}

/// Decode image bytes and shrink them into a preview thumbnail.
pub fn create_preview(bytes: &[u8], bounds: PreviewBox) -> Result<DecodedImage, DecodeError> {
    let image = decode_bytes(bytes)?;
    generate_preview(&image, bounds)
}

/// Calculate dimensions that fit within `bounds` while preserving aspect ratio.
///
/// Returns the input unchanged when it already fits. Each output edge is
/// at least 1 and never exceeds the box.
pub fn fit_dimensions(width: u32, height: u32, bounds: PreviewBox) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    if bounds.contains(width, height) {
        return (width, height);
    }

    let scale_x = bounds.max_width as f64 / width as f64;
    let scale_y = bounds.max_height as f64 / height as f64;
    let scale = scale_x.min(scale_y);

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, bounds.max_width.max(1));
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, bounds.max_height.max(1));

    (new_width, new_height)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
