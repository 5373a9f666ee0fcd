//! `pngshrink convert`: batch conversion with live progress logging.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use pngshrink_core::batch::{
    collect_inputs, find_output_collisions, BatchConverter, BatchSummary, CancelToken,
    ProgressEvent,
};
use pngshrink_core::encode::{EncodeRequest, OutputFormat};

pub struct ConvertArgs {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub max_size_mb: u32,
    pub quality: u8,
    pub jobs: usize,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let files = collect_inputs(&args.inputs);
    if files.is_empty() {
        bail!("no PNG files found in the given inputs");
    }

    let output_dir = match args.output {
        Some(dir) => dir,
        None => default_output_dir(&args.inputs)
            .context("could not determine an output folder; pass --output")?,
    };
    prepare_output_dir(&output_dir)?;

    let collisions = find_output_collisions(&files, &output_dir, args.format);
    if !collisions.is_empty() {
        let names: Vec<String> = collisions.iter().map(|p| p.display().to_string()).collect();
        bail!(
            "several inputs would write the same output file: {}",
            names.join(", ")
        );
    }

    let request = EncodeRequest::from_megabytes(args.format, args.quality, args.max_size_mb);
    let converter = BatchConverter::new(args.jobs).context("failed to start worker pool")?;

    info!(
        "Converting {} file(s) to {} (max {} MB, quality <= {}) into {} using {} thread(s)",
        files.len(),
        args.format,
        args.max_size_mb,
        args.quality,
        output_dir.display(),
        converter.threads()
    );

    let summary = run_with_progress(&converter, &files, &output_dir, &request);
    report(&summary)
}

/// Folder to write into when `--output` is not given: the first folder
/// among the inputs, else the folder of the first file.
pub fn default_output_dir(inputs: &[PathBuf]) -> Option<PathBuf> {
    if let Some(dir) = inputs.iter().find(|p| p.is_dir()) {
        return Some(dir.clone());
    }

    let first = inputs.first()?;
    match first.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
        _ => Some(PathBuf::from(".")),
    }
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            bail!("output path {} is not a folder", dir.display());
        }
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output folder {}", dir.display()))
}

/// Run the batch on a background thread and log events as they arrive.
fn run_with_progress(
    converter: &BatchConverter,
    files: &[PathBuf],
    output_dir: &Path,
    request: &EncodeRequest,
) -> BatchSummary {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();

    thread::scope(|scope| {
        let worker = scope.spawn(|| converter.run(files, output_dir, request, &cancel, Some(tx)));

        for event in rx {
            log_event(&event);
        }

        match worker.join() {
            Ok(summary) => summary,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

fn log_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::Converted {
            outcome,
            completed,
            total,
        } => {
            let name = file_name(&outcome.output);
            if outcome.satisfied_budget {
                info!(
                    "[{completed}/{total}] {name} ({:.2} MB, quality {})",
                    mb(outcome.size),
                    outcome.quality_used
                );
            } else {
                warn!(
                    "[{completed}/{total}] {name} is still {:.2} MB at quality {}",
                    mb(outcome.size),
                    outcome.quality_used
                );
            }
        }
        ProgressEvent::Failed {
            input,
            reason,
            completed,
            total,
        } => {
            warn!("[{completed}/{total}] {} failed: {reason}", file_name(input));
        }
        ProgressEvent::Skipped {
            input,
            completed,
            total,
        } => {
            info!("[{completed}/{total}] {} skipped", file_name(input));
        }
    }
}

fn report(summary: &BatchSummary) -> Result<()> {
    let over = summary.over_budget().count();
    info!(
        "Done: {} converted, {} over budget, {} failed, {} skipped",
        summary.converted.len(),
        over,
        summary.failed.len(),
        summary.skipped.len()
    );

    if !summary.failed.is_empty() {
        bail!("{} file(s) failed to convert", summary.failed.len());
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
