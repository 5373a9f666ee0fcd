//! JPEG encoding at a single quality.
//!
//! Uses `jpeg-encoder` with optimized Huffman tables, which makes every
//! quality step noticeably smaller than a baseline encode.

use jpeg_encoder::{ColorType, Encoder};

use super::types::validate_rgb;
use super::{EncodeError, OutputFormat};

/// Largest edge a JPEG frame header can store.
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality); clamped
///
/// # Errors
///
/// Returns `InvalidDimensions` or `InvalidPixelData` for a malformed buffer,
/// and `EncodingFailed` for edges over 65535 pixels or when the encoder
/// rejects the image.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(EncodeError::EncodingFailed {
                format: OutputFormat::Jpeg,
                reason: format!(
                    "{width}x{height} exceeds the {JPEG_MAX_DIMENSION}px JPEG edge limit"
                ),
            })
        }
    };

    let quality = quality.clamp(1, 100);

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_optimized_huffman_tables(true);

    encoder
        .encode(pixels, w, h, ColorType::Rgb)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            reason: e.to_string(),
        })?;

    Ok(buffer)
}
