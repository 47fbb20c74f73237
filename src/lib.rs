//! # ziped
//!
//! A transactional batch editor for the entries of zip archives.
//!
//! The crate edits the contents, names, and membership of entries inside
//! many archive files at once, optionally piping entry bytes through an
//! external command. Each archive is processed as a transaction: the file is
//! either left fully intact (no-op or failure) or atomically replaced by a
//! fully written result; a partially written archive never becomes visible
//! at the original path.
//!
//! ## Editing One Archive
//!
//! ```rust,no_run
//! use ziped::filter::{FilterSpec, PathFilter};
//! use ziped::transaction::{OutputTarget, Transaction};
//! use ziped::transform::Remove;
//! use ziped::Result;
//!
//! fn main() -> Result<()> {
//!     let filter = PathFilter::compile(&FilterSpec::wildcard("**/*.log"))?;
//!     let transform = Remove::new(filter);
//!
//!     let modified = Transaction::new("app.zip".as_ref(), &OutputTarget::Overwrite)
//!         .run(&transform)?;
//!     println!("modified: {}", modified);
//!     Ok(())
//! }
//! ```
//!
//! ## Editing Many Archives Concurrently
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use ziped::filter::{FilterSpec, PathFilter};
//! use ziped::pipe::CommandLine;
//! use ziped::progress::NoProgress;
//! use ziped::scheduler::{run_batch, BatchOptions};
//! use ziped::transaction::OutputTarget;
//! use ziped::transform::Convert;
//! use ziped::Result;
//!
//! fn main() -> Result<()> {
//!     let filter = PathFilter::compile(&FilterSpec::wildcard("*.txt"))?;
//!     let transform = Convert::new(filter, CommandLine::parse("sort")?);
//!
//!     let paths: Vec<PathBuf> = vec!["a.zip".into(), "b.zip".into()];
//!     let options = BatchOptions { jobs: 4, ..BatchOptions::default() };
//!     let batch = run_batch(&paths, &OutputTarget::Overwrite, &options, &transform, &NoProgress);
//!
//!     for (path, error) in batch.errors() {
//!         eprintln!("{}: {}", path.display(), error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Crash-safe overwrite**: the replacement is staged in a temporary file
//!   in the source's directory and renamed into place, so the swap is atomic.
//! - **Exclusive explicit output**: an `--out` path that already exists is an
//!   error, never silently overwritten.
//! - **First-error cancellation**: in a batch, the first failure stops
//!   not-yet-started jobs; finished files stay committed and every error is
//!   reported.
//! - **Deadlock-free piping**: entry bytes are fed to the external command on
//!   a dedicated thread while its output is drained concurrently.
//!
//! The zip container format itself (central directory, compression) is
//! delegated to the `zip` crate; this crate owns the edit protocol around it.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod filter;
pub mod pipe;
pub mod progress;
pub mod scheduler;
pub mod store;
pub mod transaction;
pub mod transform;

pub use error::{Error, Result};
pub use filter::{FilterSpec, PathFilter};
pub use pipe::CommandLine;
pub use progress::{BatchProgress, NoProgress, progress_fn};
pub use scheduler::{BatchOptions, BatchResult, JobResult, JobState, run_batch};
pub use store::{Archive, EntryHeader, OpenOptions, encoding_from_label};
pub use transaction::{OutputTarget, Transaction};
pub use transform::{Convert, List, Remove, Rename, Transform};
