//! Worker pool that converts a list of files in parallel.
//!
//! One rayon task per file. Progress goes out through an unbounded
//! `mpsc` channel, so workers never wait on the receiver. Cancellation is
//! checked before each file starts; a file already being encoded runs to
//! completion.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::debug;

use super::{convert_file, ConvertOutcome};
use crate::encode::EncodeRequest;

/// Shared flag that asks a running batch to stop between files.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Notification sent after each file finishes.
///
/// `completed` counts files finished so far (in any state) out of `total`.
/// Events arrive in completion order, not input order.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Converted {
        outcome: ConvertOutcome,
        completed: usize,
        total: usize,
    },
    Failed {
        input: PathBuf,
        reason: String,
        completed: usize,
        total: usize,
    },
    /// The batch was cancelled before this file started.
    Skipped {
        input: PathBuf,
        completed: usize,
        total: usize,
    },
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub converted: Vec<ConvertOutcome>,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: Vec<PathBuf>,
    pub cancelled: bool,
}

impl BatchSummary {
    /// Converted files that still exceed the byte budget.
    pub fn over_budget(&self) -> impl Iterator<Item = &ConvertOutcome> {
        self.converted.iter().filter(|o| !o.satisfied_budget)
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

enum FileResult {
    Converted(ConvertOutcome),
    Failed(PathBuf, String),
    Skipped(PathBuf),
}

/// Fixed-size pool for converting many files.
pub struct BatchConverter {
    pool: ThreadPool,
}

impl BatchConverter {
    /// Build a pool with `jobs` workers; `0` uses one per CPU.
    pub fn new(jobs: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("pngshrink-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Convert every input into `output_dir`.
    ///
    /// A failing file is recorded and the rest of the batch continues.
    /// Output name collisions are not checked here; see
    /// [`find_output_collisions`](super::find_output_collisions).
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        request: &EncodeRequest,
        cancel: &CancelToken,
        progress: Option<Sender<ProgressEvent>>,
    ) -> BatchSummary {
        let total = inputs.len();
        let completed = AtomicUsize::new(0);

        debug!(files = total, threads = self.threads(), "starting batch");

        let results: Vec<FileResult> = self.pool.install(|| {
            inputs
                .par_iter()
                .map_with(progress, |progress, input| {
                    let result = if cancel.is_cancelled() {
                        FileResult::Skipped(input.clone())
                    } else {
                        match convert_file(input, output_dir, request) {
                            Ok(outcome) => FileResult::Converted(outcome),
                            Err(e) => {
                                debug!(input = %input.display(), error = %e, "conversion failed");
                                FileResult::Failed(input.clone(), e.to_string())
                            }
                        }
                    };

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(tx) = progress {
                        // A dropped receiver only means nobody is listening
                        let _ = tx.send(event_for(&result, done, total));
                    }
                    result
                })
                .collect()
        });

        let mut summary = BatchSummary {
            cancelled: cancel.is_cancelled(),
            ..Default::default()
        };
        for result in results {
            match result {
                FileResult::Converted(outcome) => summary.converted.push(outcome),
                FileResult::Failed(input, reason) => summary.failed.push((input, reason)),
                FileResult::Skipped(input) => summary.skipped.push(input),
            }
        }
        summary
    }
}

fn event_for(result: &FileResult, completed: usize, total: usize) -> ProgressEvent {
    match result {
        FileResult::Converted(outcome) => ProgressEvent::Converted {
            outcome: outcome.clone(),
            completed,
            total,
        },
        FileResult::Failed(input, reason) => ProgressEvent::Failed {
            input: input.clone(),
            reason: reason.clone(),
            completed,
            total,
        },
        FileResult::Skipped(input) => ProgressEvent::Skipped {
            input: input.clone(),
            completed,
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::OutputFormat;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::fs;
    use std::sync::mpsc;
    use tempfile::tempdir;

    fn write_png(path: &Path, seed: u8) {
        let img = RgbImage::from_fn(24, 16, |x, y| Rgb([x as u8 ^ seed, y as u8, seed]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn request() -> EncodeRequest {
        EncodeRequest::from_megabytes(OutputFormat::Jpeg, 90, 1)
    }

    #[test]
    fn test_cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_zero_jobs_uses_available_cpus() {
        let converter = BatchConverter::new(0).unwrap();
        assert!(converter.threads() >= 1);

        let converter = BatchConverter::new(2).unwrap();
        assert_eq!(converter.threads(), 2);
    }

    #[test]
    fn test_converts_all_files_and_reports_progress() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();

        let inputs: Vec<PathBuf> = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("img{i}.png"));
                write_png(&path, i * 40);
                path
            })
            .collect();

        let (tx, rx) = mpsc::channel();
        let converter = BatchConverter::new(3).unwrap();
        let summary = converter.run(&inputs, &out, &request(), &CancelToken::new(), Some(tx));

        assert_eq!(summary.converted.len(), 5);
        assert!(summary.failed.is_empty());
        assert!(summary.is_success());
        for i in 0..5 {
            assert!(out.join(format!("img{i}.jpg")).exists());
        }

        let events: Vec<ProgressEvent> = rx.iter().collect();
        assert_eq!(events.len(), 5);

        // Order across files is not guaranteed, but the counter covers 1..=5
        let mut counts: Vec<usize> = events
            .iter()
            .map(|e| match e {
                ProgressEvent::Converted {
                    completed, total, ..
                } => {
                    assert_eq!(*total, 5);
                    *completed
                }
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_failing_file_does_not_stop_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_png(&good, 1);
        fs::write(&bad, b"definitely not a png").unwrap();

        let (tx, rx) = mpsc::channel();
        let converter = BatchConverter::new(2).unwrap();
        let summary = converter.run(
            &[bad.clone(), good],
            dir.path(),
            &request(),
            &CancelToken::new(),
            Some(tx),
        );

        assert_eq!(summary.converted.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, bad);
        assert!(!summary.is_success());

        let failures = rx
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Failed { .. }))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn test_cancelled_batch_skips_everything() {
        let dir = tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("c{i}.png"));
                write_png(&path, i);
                path
            })
            .collect();

        let cancel = CancelToken::new();
        cancel.cancel();

        let converter = BatchConverter::new(2).unwrap();
        let summary = converter.run(&inputs, dir.path(), &request(), &cancel, None);

        assert!(summary.cancelled);
        assert_eq!(summary.skipped.len(), 3);
        assert!(summary.converted.is_empty());
        assert!(!dir.path().join("c0.jpg").exists());
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("solo.png");
        write_png(&input, 9);

        let (tx, rx) = mpsc::channel();
        drop(rx);

        let converter = BatchConverter::new(1).unwrap();
        let summary = converter.run(&[input], dir.path(), &request(), &CancelToken::new(), Some(tx));
        assert_eq!(summary.converted.len(), 1);
    }

    #[test]
    fn test_over_budget_files_are_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("big.png");
        write_png(&input, 3);

        let tiny = EncodeRequest::new(OutputFormat::Jpeg, 90, 1);
        let converter = BatchConverter::new(1).unwrap();
        let summary = converter.run(&[input], dir.path(), &tiny, &CancelToken::new(), None);

        assert_eq!(summary.converted.len(), 1);
        assert_eq!(summary.over_budget().count(), 1);
        assert!(summary.is_success());
    }
}
