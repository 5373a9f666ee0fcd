//! Single-file conversion: decode, shrink to budget, write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;
use tracing::debug;

use super::output_path_for;
use crate::decode::{decode_bytes, DecodeError};
use crate::encode::{encode_to_budget, EncodeError, EncodeRequest};

/// Errors from converting one file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// Reading the input or writing the output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Quality of the written file.
    pub quality_used: u8,
    /// Whether the written file fits the byte budget.
    pub satisfied_budget: bool,
    /// Size of the written file in bytes.
    pub size: u64,
    pub attempts: u32,
}

/// Write `bytes` to `path` without ever leaving a partial file behind.
///
/// The data goes to a hidden temp file in the destination folder first and
/// is then renamed over `path`, replacing any existing file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = Builder::new().prefix(".tmp_").tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Convert one PNG into `output_dir` under the request's budget.
///
/// The output name is derived from the input stem (see [`output_path_for`]).
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    request: &EncodeRequest,
) -> Result<ConvertOutcome, ConvertError> {
    let bytes = fs::read(input).map_err(|source| ConvertError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let image = decode_bytes(&bytes)?;
    let result = encode_to_budget(&image, request)?;
    let output = output_path_for(input, output_dir, request.format);

    write_atomic(&output, &result.bytes).map_err(|source| ConvertError::Io {
        path: output.clone(),
        source,
    })?;

    let size = result.bytes.len() as u64;
    debug!(
        input = %input.display(),
        output = %output.display(),
        quality = result.quality_used,
        size,
        budget = request.byte_budget,
        satisfied = result.satisfied_budget,
        "converted"
    );

    Ok(ConvertOutcome {
        input: input.to_path_buf(),
        output,
        quality_used: result.quality_used,
        satisfied_budget: result.satisfied_budget,
        size,
        attempts: result.attempts,
    })
}
