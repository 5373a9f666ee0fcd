//! Encoding bindings.
//!
//! - [`encode_jpeg`] - Encode RGB pixel data to JPEG at one quality
//! - [`encode_to_budget`] - Step quality down until the output fits a byte budget
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_to_budget } from '@pngshrink/wasm';
//!
//! const result = encode_to_budget(decode_image(bytes), "jpeg", 100, 4 * 1024 * 1024);
//! if (!result.satisfied_budget) {
//!   console.warn(`still ${result.byte_length} bytes at quality ${result.quality_used}`);
//! }
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! ```

use std::str::FromStr;

use crate::types::{JsDecodedImage, JsEncodeResult};
use pngshrink_core::encode::{self, EncodeRequest, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data to JPEG bytes.
///
/// `quality` is clamped to 1-100.
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match width * height * 3
/// or either dimension is zero.
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode `image` at the highest quality (starting from `quality_ceiling`)
/// whose output is at most `byte_budget` bytes.
///
/// If nothing down to quality 10 fits, the quality-10 attempt is returned
/// with `satisfied_budget` set to `false`.
///
/// # Arguments
///
/// * `format` - `"jpeg"` or `"jpg"`; WebP is not available in this build
/// * `quality_ceiling` - Starting quality, 1-100
/// * `byte_budget` - Maximum output size in bytes, non-zero
#[wasm_bindgen]
pub fn encode_to_budget(
    image: &JsDecodedImage,
    format: &str,
    quality_ceiling: u8,
    byte_budget: u32,
) -> Result<JsEncodeResult, JsValue> {
    let format = OutputFormat::from_str(format).map_err(|e| JsValue::from_str(&e))?;
    let request = EncodeRequest::new(format, quality_ceiling, u64::from(byte_budget));

    encode::encode_to_budget(&image.to_decoded(), &request)
        .map(JsEncodeResult::from_result)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
