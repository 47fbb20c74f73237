//! Bounded-concurrency scheduling of archive transactions.
//!
//! [`run_batch`] applies one transform to a set of archive files under a
//! concurrency bound. Workers pull paths from a shared cursor in input order;
//! completion order is unconstrained. The first error sets a cooperative
//! cancellation flag: in-flight jobs finish, not-yet-started jobs never
//! begin, and already-committed files stay committed (there is no batch-wide
//! rollback — per-file atomicity is the transaction's job).
//!
//! With `jobs == 1` the batch degenerates to strictly sequential processing
//! in input order.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crate::progress::BatchProgress;
use crate::store::OpenOptions;
use crate::transaction::{OutputTarget, Transaction};
use crate::transform::Transform;
use crate::Error;

/// Batch scheduling configuration.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Concurrency bound; values below 1 are coerced to 1.
    pub jobs: usize,
    /// Entry-name fallback encoding applied when opening each archive.
    pub open_options: OpenOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            open_options: OpenOptions::default(),
        }
    }
}

/// How one job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// The transform modified the archive and an output artifact was written.
    Updated,
    /// The transform matched nothing; no output artifact exists.
    NotUpdated,
    /// The transaction failed; the source file is unmodified.
    Failed,
}

/// The outcome of one job, produced exactly once per started job.
#[derive(Debug)]
pub struct JobResult {
    /// The archive file this job processed.
    pub path: PathBuf,
    /// How the job ended.
    pub state: JobState,
    /// The error for [`JobState::Failed`] jobs.
    pub error: Option<Error>,
}

/// The aggregated outcome of a batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// Per-job results in input order. Jobs cancelled before starting have
    /// no result; their files were never opened.
    pub results: Vec<JobResult>,
    /// Whether the batch was cut short by an error.
    pub cancelled: bool,
}

impl BatchResult {
    /// Returns every collected error with its file path, in input order.
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| (r.path.as_path(), e)))
    }

    /// Returns whether any job failed.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.state == JobState::Failed)
    }
}

/// Applies one transform to every path under a concurrency bound.
///
/// Dispatch follows input order; up to `options.jobs` transactions run
/// concurrently, each owning its archive handle exclusively. Progress is
/// reported per completed job. All errors are collected, not just the first.
pub fn run_batch<T, P>(
    paths: &[PathBuf],
    target: &OutputTarget,
    options: &BatchOptions,
    transform: &T,
    progress: &P,
) -> BatchResult
where
    T: Transform + Sync,
    P: BatchProgress + ?Sized,
{
    let workers = options.jobs.max(1).min(paths.len().max(1));
    let cursor = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);
    let collected: Mutex<Vec<(usize, JobResult)>> = Mutex::new(Vec::with_capacity(paths.len()));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    // Cooperative cancellation, checked only between jobs.
                    if cancelled.load(Ordering::Acquire) {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(path) = paths.get(index) else {
                        break;
                    };

                    let transaction =
                        Transaction::new(path, target).open_options(options.open_options);
                    let result = match transaction.run(transform) {
                        Ok(true) => JobResult {
                            path: path.clone(),
                            state: JobState::Updated,
                            error: None,
                        },
                        Ok(false) => JobResult {
                            path: path.clone(),
                            state: JobState::NotUpdated,
                            error: None,
                        },
                        Err(error) => {
                            log::debug!("job failed for '{}': {}", path.display(), error);
                            cancelled.store(true, Ordering::Release);
                            JobResult {
                                path: path.clone(),
                                state: JobState::Failed,
                                error: Some(error),
                            }
                        }
                    };

                    progress.on_job_complete(path);
                    collected
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .push((index, result));
                }
            });
        }
    });

    progress.on_finish();

    let mut collected = collected.into_inner().unwrap_or_else(|e| e.into_inner());
    collected.sort_by_key(|(index, _)| *index);

    BatchResult {
        results: collected.into_iter().map(|(_, result)| result).collect(),
        cancelled: cancelled.into_inner(),
    }
}
