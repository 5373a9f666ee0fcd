//! WASM-compatible wrapper types for images and encode results.

use pngshrink_core::decode::{DecodedImage, FilterType};
use pngshrink_core::encode::EncodeResult;
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// Calling `pixels()` copies the buffer out to a JavaScript `Uint8Array`.
/// Keep the image on the WASM side when chaining resize and encode calls.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGB pixel data (3 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as a Uint8Array copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Release WASM memory now instead of waiting for the finalizer.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Copy back into a core image for passing to core functions.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Outcome of a budget-driven encode.
#[wasm_bindgen]
pub struct JsEncodeResult {
    bytes: Vec<u8>,
    quality_used: u8,
    satisfied_budget: bool,
    attempts: u32,
    mime_type: String,
}

#[wasm_bindgen]
impl JsEncodeResult {
    /// Encoded file bytes as a Uint8Array copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    #[wasm_bindgen(getter)]
    pub fn quality_used(&self) -> u8 {
        self.quality_used
    }

    /// `false` when even the lowest quality tried exceeds the budget.
    #[wasm_bindgen(getter)]
    pub fn satisfied_budget(&self) -> bool {
        self.satisfied_budget
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// MIME type of the encoded bytes, e.g. `image/jpeg`.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }
}

impl JsEncodeResult {
    pub(crate) fn from_result(result: EncodeResult) -> Self {
        Self {
            quality_used: result.quality_used,
            satisfied_budget: result.satisfied_budget,
            attempts: result.attempts,
            mime_type: result.format.mime_type().to_string(),
            bytes: result.bytes,
        }
    }
}

/// Convert a u8 filter value to the core FilterType.
///
/// 0 = Area (default), 1 = Nearest, 2 = Bilinear, 3 = Lanczos3.
/// Any other value falls back to Area.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        1 => FilterType::Nearest,
        2 => FilterType::Bilinear,
        3 => FilterType::Lanczos3,
        _ => FilterType::Area,
    }
}
