//! Progress reporting for batch runs.
//!
//! The scheduler reports through the [`BatchProgress`] trait; rendering is a
//! pure side effect and never a correctness concern. [`NoProgress`] is the
//! discard sink used when progress display is disabled.

use std::path::Path;

/// Observer notified as batch jobs complete.
///
/// Implementations must be shareable across the scheduler's workers.
pub trait BatchProgress: Sync {
    /// Called after each job finishes, whether it updated the archive,
    /// left it untouched, or failed.
    fn on_job_complete(&self, path: &Path);

    /// Called once after all workers have stopped.
    fn on_finish(&self) {}
}

/// Discards all progress events.
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn on_job_complete(&self, _path: &Path) {}
}

/// Wraps a closure as a [`BatchProgress`] observer.
///
/// ```rust
/// use ziped::progress::progress_fn;
///
/// let progress = progress_fn(|path: &std::path::Path| {
///     eprintln!("done: {}", path.display());
/// });
/// ```
pub fn progress_fn<F>(f: F) -> ProgressFn<F>
where
    F: Fn(&Path) + Sync,
{
    ProgressFn(f)
}

/// Adapter returned by [`progress_fn`].
pub struct ProgressFn<F>(F);

impl<F> BatchProgress for ProgressFn<F>
where
    F: Fn(&Path) + Sync,
{
    fn on_job_complete(&self, path: &Path) {
        (self.0)(path)
    }
}
