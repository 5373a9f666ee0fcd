//! Input discovery and output naming.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::encode::OutputFormat;

/// Extension accepted as conversion input (compared case-insensitively).
pub const INPUT_EXTENSION: &str = "png";

/// Check whether a path names a PNG by extension.
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
        .unwrap_or(false)
}

/// List the PNG files directly inside `dir`, sorted by path.
///
/// Subdirectories are not searched.
pub fn png_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_png_path(path))
        .collect();
    files.sort();
    files
}

/// Expand user-selected paths into the list of PNG files to convert.
///
/// Existing PNG files are kept as given, directories contribute their
/// top-level PNG files, and anything else is ignored. Duplicates are dropped
/// and first-seen order is kept.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let candidates = if path.is_dir() {
            png_files_in(path)
        } else if path.is_file() && is_png_path(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };

        for candidate in candidates {
            if seen.insert(candidate.clone()) {
                inputs.push(candidate);
            }
        }
    }

    inputs
}

/// Output file for `input`: `<output_dir>/<stem>.<jpg|webp>`.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or_else(|| OsStr::new("image"))
        .to_os_string();
    name.push(".");
    name.push(format.extension());
    output_dir.join(name)
}

/// Output paths that more than one input would write to.
///
/// Two inputs with the same stem in different folders collide in a shared
/// output folder; callers should refuse to start such a batch.
pub fn find_output_collisions(
    inputs: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
) -> Vec<PathBuf> {
    let mut counts: HashMap<PathBuf, usize> = HashMap::new();
    for input in inputs {
        *counts
            .entry(output_path_for(input, output_dir, format))
            .or_default() += 1;
    }

    let mut collisions: Vec<PathBuf> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path)
        .collect();
    collisions.sort();
    collisions
}
