//! Crash-safe execution of one transform against one archive file.
//!
//! A [`Transaction`] owns the open→mutate→commit lifecycle for a single
//! archive file. On success the source is atomically replaced (or an
//! explicit output written); on a no-op or failure nothing is written and
//! the source file, including its modification time, is untouched.
//!
//! At no point does a partially written archive become visible at the
//! original path: the serialized replacement is staged in a temporary file
//! in the **same directory** as the source, so the final rename stays on one
//! filesystem and is atomic.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::store::{Archive, OpenOptions};
use crate::transform::Transform;
use crate::{Error, Result};

/// Where a modified archive is written.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Atomically replace the source file.
    Overwrite,
    /// Write to an explicit path, created exclusively; fails if the path
    /// already exists.
    Path(PathBuf),
}

/// The open→mutate→commit-or-discard unit of work for one archive file.
pub struct Transaction<'a> {
    source: &'a Path,
    target: &'a OutputTarget,
    open_options: OpenOptions,
}

impl<'a> Transaction<'a> {
    /// Creates a transaction for one source archive.
    pub fn new(source: &'a Path, target: &'a OutputTarget) -> Self {
        Self {
            source,
            target,
            open_options: OpenOptions::default(),
        }
    }

    /// Sets the archive open options (entry-name fallback encoding).
    pub fn open_options(mut self, options: OpenOptions) -> Self {
        self.open_options = options;
        self
    }

    /// Runs the transform and commits the result.
    ///
    /// Returns whether the archive was modified and an output artifact was
    /// written. Every handle is released on every exit path; an error leaves
    /// the source file byte-identical and its metadata unchanged.
    pub fn run<T: Transform>(&self, transform: &T) -> Result<bool> {
        let source_file = File::open(self.source)?;
        let mut archive = Archive::open_with_options(source_file, &self.open_options)?;

        if !transform.apply(&mut archive)? {
            return Ok(false);
        }

        match self.target {
            OutputTarget::Path(path) => self.commit_to_path(&mut archive, path)?,
            OutputTarget::Overwrite => self.commit_overwrite(archive)?,
        }

        Ok(true)
    }

    /// Serializes into an exclusively created output file.
    fn commit_to_path<R: io::Read + io::Seek>(
        &self,
        archive: &mut Archive<R>,
        path: &Path,
    ) -> Result<()> {
        let sink = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    Error::OutputExists {
                        path: path.display().to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;

        if let Err(e) = archive.serialize(sink) {
            // The partial output is ours; do not leave it behind.
            if let Err(rm) = std::fs::remove_file(path) {
                log::warn!("failed to remove partial output '{}': {}", path.display(), rm);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Serializes into a same-directory temporary file, then renames it over
    /// the source.
    fn commit_overwrite<R: io::Read + io::Seek>(&self, mut archive: Archive<R>) -> Result<()> {
        let dir = self
            .source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut staged = NamedTempFile::new_in(dir)?;
        archive.serialize(staged.as_file_mut())?;

        // The archive holds the source file handle; release it before the
        // swap (rename over an open file fails on some platforms). A failed
        // persist removes the temporary file itself.
        drop(archive);
        staged.persist(self.source).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }
}
