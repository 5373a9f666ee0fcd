//! Image encoding pipeline for pngshrink.
//!
//! This module provides functionality for:
//! - Encoding images to JPEG or lossy WebP at a single quality
//! - Searching for the highest quality that fits a byte budget
//!
//! All operations are synchronous and own no shared state, so callers may
//! run any number of them in parallel on different images.
//!
//! # Examples
//!
//! ```ignore
//! use pngshrink_core::encode::{encode_to_budget, EncodeRequest, OutputFormat};
//!
//! let request = EncodeRequest::from_megabytes(OutputFormat::Jpeg, 100, 4);
//! let result = encode_to_budget(&image, &request).unwrap();
//! println!("q={} {} bytes", result.quality_used, result.bytes.len());
//! ```

mod budget;
mod jpeg;
mod types;
#[cfg(feature = "webp")]
mod webp;

pub use budget::{encode_at, encode_to_budget, next_quality, quality_schedule};
pub use jpeg::{encode_jpeg, JPEG_MAX_DIMENSION};
pub use types::{EncodeError, EncodeRequest, EncodeResult, OutputFormat, QUALITY_FLOOR};
#[cfg(feature = "webp")]
pub use self::webp::{encode_webp, WEBP_MAX_DIMENSION};
