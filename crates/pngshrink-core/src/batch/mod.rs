//! Multi-file conversion driver.
//!
//! Collects PNG inputs, derives output names from input stems, and runs one
//! conversion task per file on a fixed-size worker pool. Each task owns its
//! own decoded image; the only shared resource is the output folder, and
//! name collisions there are for the caller to rule out up front.

mod convert;
mod inputs;
mod pool;

pub use convert::{convert_file, write_atomic, ConvertError, ConvertOutcome};
pub use inputs::{
    collect_inputs, find_output_collisions, is_png_path, output_path_for, png_files_in,
    INPUT_EXTENSION,
};
pub use pool::{BatchConverter, BatchSummary, CancelToken, ProgressEvent};
