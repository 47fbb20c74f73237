//! Substring renaming of matching entry names.

use std::io::{Read, Seek};

use crate::store::Archive;
use crate::{PathFilter, Result};

use super::Transform;

/// Replaces the first occurrence of a substring in every matching entry name.
///
/// Entries whose name is unchanged by the replacement are skipped and do not
/// count as a modification. A rename that collides with another entry aborts
/// the whole transaction.
pub struct Rename {
    filter: PathFilter,
    from: String,
    to: String,
}

impl Rename {
    /// Creates a rename transform replacing `from` with `to`.
    pub fn new(filter: PathFilter, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            filter,
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Transform for Rename {
    fn apply<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<bool> {
        let mut modified = false;
        for header in archive.entries() {
            if !self.filter.matches(&header.name) {
                continue;
            }

            let new_name = header.name.replacen(&self.from, &self.to, 1);
            if new_name == header.name {
                continue;
            }

            archive.rename(&header.name, &new_name)?;
            modified = true;
        }

        Ok(modified)
    }
}
