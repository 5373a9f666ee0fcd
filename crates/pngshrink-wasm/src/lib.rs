//! pngshrink WASM - WebAssembly bindings for the pngshrink engine
//!
//! Exposes decoding, preview resizing, and size-constrained encoding to a
//! browser front end. The core crate is built without its `webp` and `batch`
//! features here, so only JPEG output is available.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images and encode results
//! - `decode` - Decoding, header info, and preview resizing
//! - `encode` - Single-quality JPEG and budget-driven encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, encode_to_budget } from '@pngshrink/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const result = encode_to_budget(image, "jpeg", 100, 4 * 1024 * 1024);
//! console.log(`quality ${result.quality_used}, ${result.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod types;

pub use decode::{create_preview, decode_image, image_info, resize_to_fit};
pub use encode::{encode_jpeg, encode_to_budget};
pub use types::{JsDecodedImage, JsEncodeResult};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
