//! Removal of matching entries.

use std::io::{Read, Seek};

use crate::store::Archive;
use crate::{PathFilter, Result};

use super::Transform;

/// Removes every entry whose name matches the filter.
///
/// Requires an explicit selector: with no filter configured the transform
/// fails instead of removing everything.
pub struct Remove {
    filter: PathFilter,
}

impl Remove {
    /// Creates a removal transform.
    pub fn new(filter: PathFilter) -> Self {
        Self { filter }
    }
}

impl Transform for Remove {
    fn apply<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<bool> {
        self.filter.require_explicit()?;

        let mut modified = false;
        for header in archive.entries() {
            if self.filter.matches(&header.name) {
                archive.remove(&header.name)?;
                modified = true;
            }
        }

        Ok(modified)
    }
}
