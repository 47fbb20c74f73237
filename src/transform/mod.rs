//! Pluggable per-archive operations.
//!
//! A [`Transform`] is the unit of work a transaction executes against one
//! open [`Archive`] handle: it inspects or mutates entries and reports
//! whether anything changed. The transaction serializes and commits only
//! when a transform reports a modification.
//!
//! Four transforms are provided:
//!
//! - [`List`]: read-only, emits matching entry names
//! - [`Remove`]: drops matching entries (requires an explicit selector)
//! - [`Rename`]: substring replacement in matching entry names
//! - [`Convert`]: pipes matching entries through an external command
//!
//! New transforms are added by implementing the same contract, not by
//! extending a shared base.

mod convert;
mod list;
mod remove;
mod rename;

pub use convert::Convert;
pub use list::List;
pub use remove::Remove;
pub use rename::Rename;

use std::io::{Read, Seek};

use crate::Result;
use crate::store::Archive;

/// A per-archive operation invoked by a transaction.
///
/// Implementations take `&self` and hold no per-archive state, so one
/// transform value can be shared by reference across concurrent workers.
pub trait Transform {
    /// Applies the operation to an open archive handle.
    ///
    /// Returns whether the archive was modified. An error discards the whole
    /// in-memory mutation for this archive; nothing is committed.
    fn apply<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<bool>;
}
