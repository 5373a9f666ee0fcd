//! Raster image decoding from bytes or files.
//!
//! Any format the `image` crate was built with is accepted; the output is
//! always 8-bit RGB. Alpha channels are dropped, matching how the converter
//! treats transparent PNGs (JPEG has no alpha and WebP output is encoded
//! from RGB).

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageDecoder, ImageReader};

use super::{DecodeError, DecodedImage, ImageInfo};

/// Decode an image from bytes, guessing the format from its content.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if the codec rejects the data.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = guessed_reader(bytes)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if the file cannot be read, otherwise the
/// same errors as [`decode_bytes`].
pub fn decode_file(path: &Path) -> Result<DecodedImage, DecodeError> {
    let bytes = read_file(path)?;
    decode_bytes(&bytes)
}

/// Read dimensions and channel count from the image header.
///
/// Only the header is parsed; pixel data is not decoded. `file_size` is the
/// length of `bytes`.
pub fn image_info_from_bytes(bytes: &[u8]) -> Result<ImageInfo, DecodeError> {
    let decoder = guessed_reader(bytes)?
        .into_decoder()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let (width, height) = decoder.dimensions();
    let channels = decoder.color_type().channel_count();

    Ok(ImageInfo {
        width,
        height,
        channels,
        file_size: bytes.len() as u64,
    })
}

/// Read header information for an image file.
pub fn read_image_info(path: &Path) -> Result<ImageInfo, DecodeError> {
    let bytes = read_file(path)?;
    image_info_from_bytes(&bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DecodeError> {
    fs::read(path).map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e)))
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    Ok(reader)
}
