//! Lossy WebP encoding at a single quality, backed by libwebp.

use super::types::validate_rgb;
use super::{EncodeError, OutputFormat};

/// Largest edge libwebp accepts.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Encode RGB pixel data to lossy WebP bytes.
///
/// `quality` is clamped to 1-100 and passed straight to libwebp.
///
/// # Errors
///
/// Returns `InvalidDimensions` or `InvalidPixelData` for a malformed buffer,
/// and `EncodingFailed` for images larger than WebP can store or when
/// libwebp reports an error.
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(EncodeError::EncodingFailed {
            format: OutputFormat::WebP,
            reason: format!(
                "{width}x{height} exceeds the {WEBP_MAX_DIMENSION}px WebP edge limit"
            ),
        });
    }

    let quality = quality.clamp(1, 100) as f32;
    let encoder = webp::Encoder::from_rgb(pixels, width, height);

    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::WebP,
            reason: format!("{e:?}"),
        })?;

    Ok(memory.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy(width: u32, height: u32) -> Vec<u8> {
        (0..(width * height * 3) as usize)
            .map(|i| ((i * 7919) % 256) as u8)
            .collect()
    }

    #[test]
    fn test_encode_webp_container() {
        let webp = encode_webp(&noisy(32, 32), 32, 32, 80).unwrap();

        // RIFF....WEBP
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_webp_decodes_back() {
        let webp = encode_webp(&noisy(40, 24), 40, 24, 60).unwrap();

        let decoded = crate::decode::decode_bytes(&webp).unwrap();
        assert_eq!((decoded.width, decoded.height), (40, 24));
    }

    #[test]
    fn test_encode_webp_lower_quality_is_smaller() {
        let pixels = noisy(64, 64);
        let high = encode_webp(&pixels, 64, 64, 95).unwrap();
        let low = encode_webp(&pixels, 64, 64, 10).unwrap();

        assert!(low.len() < high.len());
    }

    #[test]
    fn test_encode_webp_invalid_buffer() {
        assert!(matches!(
            encode_webp(&[0u8; 10], 2, 2, 80),
            Err(EncodeError::InvalidPixelData { .. })
        ));
        assert!(matches!(
            encode_webp(&[], 0, 0, 80),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_webp_too_wide() {
        let width = WEBP_MAX_DIMENSION + 1;
        let pixels = vec![0u8; width as usize * 3];

        assert!(matches!(
            encode_webp(&pixels, width, 1, 80),
            Err(EncodeError::EncodingFailed {
                format: OutputFormat::WebP,
                ..
            })
        ));
    }
}
