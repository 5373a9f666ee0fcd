//! Decoding and preview bindings.
//!
//! - [`decode_image`] - Decode PNG/JPEG/WebP bytes to RGB
//! - [`image_info`] - Read dimensions and channel count from the header
//! - [`resize_to_fit`] - Shrink an image into a bounding box, never upscaling
//! - [`create_preview`] - Decode and shrink in one call
//!
//! # Example
//!
//! ```typescript
//! import { create_preview, image_info } from '@pngshrink/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const info = image_info(bytes); // { width, height, channels, file_size }
//! const preview = create_preview(bytes, 300, 300);
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use pngshrink_core::decode::{self, PreviewBox};
use wasm_bindgen::prelude::*;

/// Decode image bytes to RGB. Alpha, if present, is discarded.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_bytes(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Read header information without decoding pixels.
///
/// Returns a plain object `{ width, height, channels, file_size }`.
#[wasm_bindgen]
pub fn image_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = decode::image_info_from_bytes(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&info).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to fit within `max_width` x `max_height`, preserving aspect ratio.
///
/// An image that already fits is returned at its original size.
///
/// # Arguments
///
/// * `filter` - 0=Area (default), 1=Nearest, 2=Bilinear, 3=Lanczos3
///
/// # Errors
///
/// Returns an error if either bound is zero.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsDecodedImage,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    let decoded = image.to_decoded();

    decode::resize_to_fit(
        &decoded,
        PreviewBox::new(max_width, max_height),
        filter_from_u8(filter),
    )
    .map(JsDecodedImage::from_decoded)
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode `bytes` and shrink the result into a preview box using area filtering.
#[wasm_bindgen]
pub fn create_preview(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<JsDecodedImage, JsValue> {
    decode::create_preview(bytes, PreviewBox::new(max_width, max_height))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
