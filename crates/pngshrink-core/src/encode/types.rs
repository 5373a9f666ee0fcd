//! Request, result, and error types for encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Lowest quality the budget search will fall back to.
pub const QUALITY_FLOOR: u8 = 10;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality ceiling outside 1-100
    #[error("Invalid quality ceiling {0}: must be between 1 and 100")]
    InvalidQuality(u8),

    /// Byte budget of zero
    #[error("Invalid byte budget: must be greater than zero")]
    InvalidBudget,

    /// The format was not compiled into this build
    #[error("{0} output is not supported by this build")]
    UnsupportedFormat(OutputFormat),

    /// The codec rejected the image
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed { format: OutputFormat, reason: String },
}

/// Target container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// File extension for output files, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => f.write_str("JPEG"),
            OutputFormat::WebP => f.write_str("WebP"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(format!("unknown output format '{other}' (expected jpeg or webp)")),
        }
    }
}

/// Parameters for one size-constrained conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeRequest {
    /// Output container format.
    pub format: OutputFormat,
    /// Highest quality attempted (1-100).
    pub quality_ceiling: u8,
    /// Maximum acceptable output size in bytes.
    pub byte_budget: u64,
}

impl EncodeRequest {
    pub fn new(format: OutputFormat, quality_ceiling: u8, byte_budget: u64) -> Self {
        Self {
            format,
            quality_ceiling,
            byte_budget,
        }
    }

    /// Build a request whose budget is `megabytes` MiB.
    pub fn from_megabytes(format: OutputFormat, quality_ceiling: u8, megabytes: u32) -> Self {
        Self::new(format, quality_ceiling, megabytes as u64 * 1024 * 1024)
    }

    /// Check the request's own preconditions.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if !(1..=100).contains(&self.quality_ceiling) {
            return Err(EncodeError::InvalidQuality(self.quality_ceiling));
        }
        if self.byte_budget == 0 {
            return Err(EncodeError::InvalidBudget);
        }
        Ok(())
    }
}

/// Outcome of a size-constrained encode.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Quality of the returned attempt.
    pub quality_used: u8,
    /// Whether `bytes` fits the requested budget.
    pub satisfied_budget: bool,
    /// Number of encode attempts made.
    pub attempts: u32,
    /// Container format of `bytes`.
    pub format: OutputFormat,
}

impl EncodeResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Validate that an RGB buffer matches its stated dimensions.
pub(crate) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = DecodedImage::expected_len(width, height);
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
