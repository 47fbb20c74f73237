//! Entry content conversion through an external command.

use std::io::{Read, Seek};

use crate::pipe::CommandLine;
use crate::store::Archive;
use crate::{PathFilter, Result};

use super::Transform;

/// Pipes every matching entry through an external command and replaces its
/// content with the command's output.
///
/// A tokenization failure, spawn failure, or non-zero exit aborts the
/// transform; the enclosing transaction then discards the whole in-memory
/// mutation for that file.
pub struct Convert {
    filter: PathFilter,
    command: CommandLine,
}

impl Convert {
    /// Creates a conversion transform running the given command.
    pub fn new(filter: PathFilter, command: CommandLine) -> Self {
        Self { filter, command }
    }
}

impl Transform for Convert {
    fn apply<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<bool> {
        let mut modified = false;
        for header in archive.entries() {
            if !self.filter.matches(&header.name) {
                continue;
            }

            log::debug!("converting '{}' via '{}'", header.name, self.command.as_str());
            let input = archive.read(&header.name)?;
            let output = self.command.pipe(input)?;
            archive.update(&header.name, output)?;
            modified = true;
        }

        Ok(modified)
    }
}
