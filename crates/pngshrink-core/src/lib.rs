//! pngshrink core - PNG to JPEG/WebP conversion under a file-size budget
//!
//! This crate provides the conversion engine behind pngshrink:
//!
//! - [`decode`]: raster decoding to RGB, header info, and aspect-preserving
//!   preview resizing
//! - [`encode`]: JPEG and WebP encoding plus the size-constrained quality
//!   search
//! - [`batch`]: input collection, atomic output writes, and the worker pool
//!   for converting many files (feature `batch`)
//!
//! # Features
//!
//! - `webp` (default): lossy WebP output via libwebp
//! - `batch` (default): multi-file driver built on rayon

pub mod decode;
pub mod encode;

#[cfg(feature = "batch")]
pub mod batch;

pub use decode::{decode_bytes, decode_file, resize_to_fit, DecodeError, DecodedImage, PreviewBox};
pub use encode::{encode_to_budget, EncodeError, EncodeRequest, EncodeResult, OutputFormat, QUALITY_FLOOR};

#[cfg(test)]
pub(crate) mod test_support {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Level;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a thread-local subscriber at `level` and return what it logged.
    pub(crate) fn capture_logs<T>(level: Level, f: impl FnOnce() -> T) -> (T, String) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        let value = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
        (value, logs)
    }
}
