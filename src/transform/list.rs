//! Read-only listing of matching entry names.

use std::io::{Read, Seek, Write};
use std::sync::Mutex;

use crate::store::Archive;
use crate::{PathFilter, Result};

use super::Transform;

/// Emits the names of matching entries, one per line.
///
/// Never reports a modification, so the enclosing transaction never writes
/// an output artifact. Entry names that were not valid UTF-8 in the container
/// have already been decoded best-effort with the configured fallback
/// encoding when the archive was opened.
pub struct List<W: Write + Send> {
    filter: PathFilter,
    out: Mutex<W>,
}

impl<W: Write + Send> List<W> {
    /// Creates a listing transform writing to the given sink.
    pub fn new(filter: PathFilter, out: W) -> Self {
        Self {
            filter,
            out: Mutex::new(out),
        }
    }

    /// Consumes the transform and returns the output sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> Transform for List<W> {
    fn apply<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<bool> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        for header in archive.entries() {
            if self.filter.matches(&header.name) {
                writeln!(out, "{}", header.name)?;
            }
        }
        Ok(false)
    }
}
