//! Image decoding and preview resizing for pngshrink.
//!
//! This module provides functionality for:
//! - Decoding PNG (or any other codec-supported raster) bytes into RGB pixels
//! - Reading image header information without a full decode
//! - Aspect-preserving resizing for preview thumbnails
//!
//! A `DecodedImage` is owned by whoever decoded it. Nothing here caches
//! decodes; a caller that wants both a preview and a conversion of the same
//! file decodes once and passes the image by reference to both.
//!
//! # Examples
//!
//! ```ignore
//! use pngshrink_core::decode::{decode_file, generate_preview, PreviewBox};
//!
//! let image = decode_file("photo.png".as_ref()).unwrap();
//! let thumb = generate_preview(&image, PreviewBox::default()).unwrap();
//! println!("Preview {}x{}", thumb.width, thumb.height);
//! ```

mod raster;
mod resize;
mod types;

pub use raster::{decode_bytes, decode_file, image_info_from_bytes, read_image_info};
pub use resize::{create_preview, fit_dimensions, generate_preview, resize, resize_to_fit};
pub use types::{DecodeError, DecodedImage, FilterType, ImageInfo, PreviewBox};
