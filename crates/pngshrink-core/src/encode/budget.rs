//! Size-constrained quality search.
//!
//! Starting at the request's quality ceiling, the image is encoded and the
//! quality is stepped down by 10% (rounded down, never below
//! [`QUALITY_FLOOR`]) until the output fits the byte budget. The floor is
//! always tried once; if even that overruns, the floor attempt is returned
//! with `satisfied_budget = false` rather than an error.
//!
//! Every attempt encodes the original pixels, so quality loss never
//! compounds across attempts.

use tracing::debug;

use super::{encode_jpeg, EncodeError, EncodeRequest, EncodeResult, OutputFormat, QUALITY_FLOOR};
use crate::decode::DecodedImage;

/// Quality to try after `quality` overran the budget.
///
/// `max(QUALITY_FLOOR, floor(quality * 0.9))`. Strictly decreasing until it
/// reaches the floor.
pub fn next_quality(quality: u8) -> u8 {
    let stepped = (quality as u32 * 9 / 10) as u8;
    stepped.max(QUALITY_FLOOR)
}

/// Every quality the search would try for `ceiling`, in order.
pub fn quality_schedule(ceiling: u8) -> Vec<u8> {
    let mut schedule = vec![ceiling];
    let mut quality = ceiling;
    while quality > QUALITY_FLOOR {
        quality = next_quality(quality);
        schedule.push(quality);
    }
    schedule
}

/// Encode `image` at a single quality in the given format.
pub fn encode_at(
    image: &DecodedImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, quality),
        #[cfg(feature = "webp")]
        OutputFormat::WebP => {
            super::encode_webp(&image.pixels, image.width, image.height, quality)
        }
        #[cfg(not(feature = "webp"))]
        OutputFormat::WebP => Err(EncodeError::UnsupportedFormat(format)),
    }
}

/// Encode `image` so that it fits `request.byte_budget` if at all possible.
///
/// # Errors
///
/// Fails only when the request is invalid (quality outside 1-100, zero
/// budget), the image buffer is malformed, or the codec rejects the image.
/// Overrunning the budget is reported through `satisfied_budget`.
pub fn encode_to_budget(
    image: &DecodedImage,
    request: &EncodeRequest,
) -> Result<EncodeResult, EncodeError> {
    request.validate()?;

    let mut quality = request.quality_ceiling;
    let mut attempts = 0u32;

    loop {
        let bytes = encode_at(image, request.format, quality)?;
        attempts += 1;

        let size = bytes.len() as u64;
        debug!(
            format = %request.format,
            quality,
            size,
            budget = request.byte_budget,
            "encode attempt"
        );

        let fits = size <= request.byte_budget;
        if fits || quality <= QUALITY_FLOOR {
            debug!(
                format = %request.format,
                quality,
                size,
                attempts,
                satisfied = fits,
                "budget search finished"
            );
            return Ok(EncodeResult {
                bytes,
                quality_used: quality,
                satisfied_budget: fits,
                attempts,
                format: request.format,
            });
        }

        quality = next_quality(quality);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use tracing::Level;

    fn noise_image(width: u32, height: u32) -> DecodedImage {
        // Deterministic LCG noise: hard to compress, so quality matters
        let mut state = 0x2545_f491u32;
        let pixels = (0..DecodedImage::expected_len(width, height))
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    fn smallest_encoding(image: &DecodedImage, ceiling: u8) -> u64 {
        quality_schedule(ceiling)
            .into_iter()
            .map(|q| encode_at(image, OutputFormat::Jpeg, q).unwrap().len() as u64)
            .min()
            .unwrap()
    }

    fn solid_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(
            width,
            height,
            vec![200u8; DecodedImage::expected_len(width, height)],
        )
    }

    #[test]
    fn test_next_quality() {
        assert_eq!(next_quality(100), 90);
        assert_eq!(next_quality(90), 81);
        assert_eq!(next_quality(81), 72);
        assert_eq!(next_quality(11), 10);
        assert_eq!(next_quality(10), 10);
        assert_eq!(next_quality(5), 10);
    }

    #[test]
    fn test_quality_schedule_from_100() {
        assert_eq!(
            quality_schedule(100),
            vec![100, 90, 81, 72, 64, 57, 51, 45, 40, 36, 32, 28, 25, 22, 19, 17, 15, 13, 11, 10]
        );
    }

    #[test]
    fn test_quality_schedule_at_or_below_floor() {
        assert_eq!(quality_schedule(10), vec![10]);
        assert_eq!(quality_schedule(3), vec![3]);
    }

    #[test]
    fn test_first_attempt_fits() {
        let image = solid_image(16, 16);
        let request = EncodeRequest::from_megabytes(OutputFormat::Jpeg, 100, 1);

        let result = encode_to_budget(&image, &request).unwrap();
        assert_eq!(result.quality_used, 100);
        assert!(result.satisfied_budget);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_steps_down_until_fit() {
        let image = noise_image(96, 96);
        let full = encode_jpeg(&image.pixels, 96, 96, 100).unwrap();
        let request = EncodeRequest::new(OutputFormat::Jpeg, 100, full.len() as u64 / 2);

        let result = encode_to_budget(&image, &request).unwrap();
        assert!(result.satisfied_budget);
        assert!(result.quality_used < 100);
        assert!(result.len() as u64 <= request.byte_budget);
        assert!(result.attempts > 1);

        // Result is exactly the encode at the reported quality
        let direct = encode_jpeg(&image.pixels, 96, 96, result.quality_used).unwrap();
        assert_eq!(direct, result.bytes);
    }

    #[test]
    fn test_budget_below_floor_returns_floor_attempt() {
        let image = noise_image(64, 64);
        let floor_size = encode_jpeg(&image.pixels, 64, 64, QUALITY_FLOOR).unwrap().len() as u64;
        let smallest = smallest_encoding(&image, 100);
        let request = EncodeRequest::new(OutputFormat::Jpeg, 100, smallest - 1);

        let result = encode_to_budget(&image, &request).unwrap();
        assert!(!result.satisfied_budget);
        assert_eq!(result.quality_used, QUALITY_FLOOR);
        assert_eq!(result.len() as u64, floor_size);
        assert_eq!(result.attempts as usize, quality_schedule(100).len());
    }

    #[test]
    fn test_one_byte_budget_is_not_an_error() {
        let image = solid_image(8, 8);
        let request = EncodeRequest::new(OutputFormat::Jpeg, 50, 1);

        let result = encode_to_budget(&image, &request).unwrap();
        assert!(!result.satisfied_budget);
        assert_eq!(result.quality_used, QUALITY_FLOOR);
    }

    #[test]
    fn test_ceiling_below_floor_single_attempt() {
        let image = noise_image(32, 32);
        let request = EncodeRequest::new(OutputFormat::Jpeg, 5, 1);

        let result = encode_to_budget(&image, &request).unwrap();
        assert_eq!(result.quality_used, 5);
        assert_eq!(result.attempts, 1);
        assert!(!result.satisfied_budget);
    }

    #[test]
    fn test_final_outcome_logged_at_debug() {
        let image = noise_image(24, 24);
        let request = EncodeRequest::new(OutputFormat::Jpeg, 50, 1);

        let (result, logs) = capture_logs(Level::DEBUG, || encode_to_budget(&image, &request));
        let result = result.unwrap();

        assert!(logs.contains("budget search finished"), "logs: {logs}");
        assert!(logs.contains("satisfied=false"), "logs: {logs}");
        assert_eq!(logs.matches("encode attempt").count(), result.attempts as usize);

        let (_, info_logs) = capture_logs(Level::INFO, || encode_to_budget(&image, &request));
        assert!(info_logs.is_empty(), "logs: {info_logs}");
    }

    #[test]
    fn test_invalid_requests() {
        let image = solid_image(4, 4);

        let zero_quality = EncodeRequest::new(OutputFormat::Jpeg, 0, 1000);
        assert!(matches!(
            encode_to_budget(&image, &zero_quality),
            Err(EncodeError::InvalidQuality(0))
        ));

        let zero_budget = EncodeRequest::new(OutputFormat::Jpeg, 80, 0);
        assert!(matches!(
            encode_to_budget(&image, &zero_budget),
            Err(EncodeError::InvalidBudget)
        ));
    }

    #[test]
    fn test_malformed_image_is_encode_error() {
        let image = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 7],
        };
        let request = EncodeRequest::new(OutputFormat::Jpeg, 80, 1000);

        assert!(matches!(
            encode_to_budget(&image, &request),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[cfg(feature = "webp")]
    #[test]
    fn test_webp_budget_search() {
        let image = noise_image(80, 80);
        let full = encode_at(&image, OutputFormat::WebP, 100).unwrap();
        let request = EncodeRequest::new(OutputFormat::WebP, 100, full.len() as u64 / 2);

        let result = encode_to_budget(&image, &request).unwrap();
        assert!(result.satisfied_budget);
        assert!(result.quality_used < 100);
        assert_eq!(&result.bytes[0..4], b"RIFF");
    }

    #[cfg(not(feature = "webp"))]
    #[test]
    fn test_webp_unsupported_without_feature() {
        let image = solid_image(4, 4);
        let request = EncodeRequest::new(OutputFormat::WebP, 80, 1000);

        assert!(matches!(
            encode_to_budget(&image, &request),
            Err(EncodeError::UnsupportedFormat(OutputFormat::WebP))
        ));
    }
}
