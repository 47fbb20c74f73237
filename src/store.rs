//! In-memory entry index over a zip container.
//!
//! [`Archive`] is the handle a transaction mutates: it exposes the ordered
//! entry headers of one archive file and supports read, replace-content,
//! remove, and rename per entry, plus full serialization to an output sink.
//! Parsing and serializing the container format itself is delegated to the
//! `zip` crate; untouched entries are copied raw, without recompression.
//!
//! A handle is owned exclusively by one transaction for its lifetime and is
//! never shared across concurrent workers, so entry mutation needs no
//! internal locking.

use std::io::{Read, Seek, Write};

use encoding_rs::Encoding;
use zip::write::SimpleFileOptions;
use zip::{DateTime, ZipArchive, ZipWriter};

use crate::{Error, Result};

/// Resolves an `encoding_rs` encoding from a WHATWG label.
///
/// Used for best-effort decoding of entry names that are not valid UTF-8.
pub fn encoding_from_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::InvalidEncoding {
        label: label.to_string(),
    })
}

/// Options controlling how an archive is opened.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Fallback encoding for entry names that are not valid UTF-8.
    pub path_encoding: &'static Encoding,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            // Single-byte fallback; every byte sequence decodes to something.
            path_encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

/// One entry's header as seen by transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Archive-relative entry name, the mutation key.
    pub name: String,
    /// Whether the stored name was not valid UTF-8 and was decoded with the
    /// configured fallback encoding.
    pub non_utf8: bool,
}

/// Per-entry mutation state.
struct EntryState {
    /// Index of the entry in the underlying container.
    index: usize,
    /// Current name; differs from the stored one after a rename.
    name: String,
    non_utf8: bool,
    renamed: bool,
    removed: bool,
    /// Replacement content, `None` while the original bytes still stand.
    data: Option<Vec<u8>>,
    mtime: Option<DateTime>,
    mode: Option<u32>,
}

/// An in-memory index over one archive file's entries.
///
/// Mutations are recorded in the index and only materialize when
/// [`serialize`](Archive::serialize) writes the full new archive.
pub struct Archive<R: Read + Seek> {
    inner: ZipArchive<R>,
    entries: Vec<EntryState>,
}

impl<R: Read + Seek> Archive<R> {
    /// Opens an archive from a byte source with default options.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_options(reader, &OpenOptions::default())
    }

    /// Opens an archive from a byte source.
    ///
    /// The whole central directory is indexed up front; entry content is only
    /// read on demand.
    pub fn open_with_options(reader: R, options: &OpenOptions) -> Result<Self> {
        let mut inner = ZipArchive::new(reader)?;

        let mut entries = Vec::with_capacity(inner.len());
        for index in 0..inner.len() {
            let file = inner.by_index_raw(index)?;
            let raw = file.name_raw().to_owned();
            let (name, non_utf8) = match std::str::from_utf8(&raw) {
                Ok(name) => (name.to_string(), false),
                Err(_) => {
                    let (decoded, _, _) = options.path_encoding.decode(&raw);
                    (decoded.into_owned(), true)
                }
            };

            entries.push(EntryState {
                index,
                name,
                non_utf8,
                renamed: false,
                removed: false,
                data: None,
                mtime: file.last_modified(),
                mode: file.unix_mode(),
            });
        }

        Ok(Self { inner, entries })
    }

    /// Returns the number of live (not removed) entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.removed).count()
    }

    /// Returns whether the archive has no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ordered headers of all live entries.
    ///
    /// The order is stable and matches the input container order; renames do
    /// not reorder entries.
    pub fn entries(&self) -> Vec<EntryHeader> {
        self.entries
            .iter()
            .filter(|e| !e.removed)
            .map(|e| EntryHeader {
                name: e.name.clone(),
                non_utf8: e.non_utf8,
            })
            .collect()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| !e.removed && e.name == name)
            .ok_or_else(|| Error::EntryNotFound {
                path: name.to_string(),
            })
    }

    /// Reads the current content of the named entry.
    ///
    /// Returns the replacement buffer if the entry was updated, otherwise
    /// decompresses the original bytes from the container.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let pos = self.position(name)?;
        if let Some(data) = &self.entries[pos].data {
            return Ok(data.clone());
        }

        let mut file = self.inner.by_index(self.entries[pos].index)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Replaces the content of the named entry.
    pub fn update(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let pos = self.position(name)?;
        self.entries[pos].data = Some(data);
        Ok(())
    }

    /// Removes the named entry from the archive.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let pos = self.position(name)?;
        self.entries[pos].removed = true;
        Ok(())
    }

    /// Renames an entry.
    ///
    /// Fails with [`Error::EntryExists`] when the target name would collide
    /// with another live entry; duplicate names are rejected rather than
    /// silently produced.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let pos = self.position(from)?;
        if from == to {
            return Ok(());
        }
        if self.entries.iter().any(|e| !e.removed && e.name == to) {
            return Err(Error::EntryExists {
                path: to.to_string(),
            });
        }

        self.entries[pos].name = to.to_string();
        self.entries[pos].renamed = true;
        Ok(())
    }

    /// Serializes the mutated archive in full to the given sink.
    ///
    /// Untouched entries are copied raw (compressed bytes and original header,
    /// including non-UTF-8 name bytes, preserved). Renamed entries are raw
    /// copied under their new name. Updated entries are recompressed with
    /// their original timestamp and permissions.
    ///
    /// This is a terminal operation: replacement buffers are moved out of the
    /// index while writing.
    pub fn serialize<W: Write + Seek>(&mut self, sink: W) -> Result<()> {
        let mut writer = ZipWriter::new(sink);

        for pos in 0..self.entries.len() {
            if self.entries[pos].removed {
                continue;
            }

            if let Some(data) = self.entries[pos].data.take() {
                let entry = &self.entries[pos];
                let mut options = SimpleFileOptions::default();
                if let Some(mtime) = entry.mtime {
                    options = options.last_modified_time(mtime);
                }
                if let Some(mode) = entry.mode {
                    options = options.unix_permissions(mode);
                }
                writer.start_file(entry.name.as_str(), options)?;
                writer.write_all(&data)?;
            } else if self.entries[pos].renamed {
                let name = self.entries[pos].name.clone();
                let file = self.inner.by_index_raw(self.entries[pos].index)?;
                writer.raw_copy_file_rename(file, name.as_str())?;
            } else {
                let file = self.inner.by_index_raw(self.entries[pos].index)?;
                writer.raw_copy_file(file)?;
            }
        }

        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    //! Archive construction helpers shared by unit tests in other modules.

    use super::*;
    use std::io::Cursor;

    /// Builds an in-memory zip; names ending in `/` become directory entries.
    pub(crate) fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = ZipWriter::new(Cursor::new(&mut buf));
        for (name, data) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
        buf
    }

    /// Builds an in-memory zip and opens a handle over it.
    pub(crate) fn make_archive(entries: &[(&str, &[u8])]) -> Archive<Cursor<Vec<u8>>> {
        Archive::open(Cursor::new(make_zip(entries))).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::make_zip;
    use super::*;
    use std::io::Cursor;

    fn reopen(archive: &mut Archive<Cursor<Vec<u8>>>) -> Archive<Cursor<Vec<u8>>> {
        let mut buf = Vec::new();
        archive.serialize(Cursor::new(&mut buf)).unwrap();
        Archive::open(Cursor::new(buf)).unwrap()
    }

    #[test]
    fn test_entries_preserve_order() {
        let bytes = make_zip(&[("b.txt", b"b"), ("a.txt", b"a"), ("c.txt", b"c")]);
        let archive = Archive::open(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_read_original_and_updated() {
        let bytes = make_zip(&[("file.txt", b"old")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.read("file.txt").unwrap(), b"old");

        archive.update("file.txt", b"new".to_vec()).unwrap();
        assert_eq!(archive.read("file.txt").unwrap(), b"new");

        let mut reopened = reopen(&mut archive);
        assert_eq!(reopened.read("file.txt").unwrap(), b"new");
    }

    #[test]
    fn test_remove_entry() {
        let bytes = make_zip(&[("keep.bin", b"k"), ("drop.txt", b"d")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        archive.remove("drop.txt").unwrap();
        assert_eq!(archive.len(), 1);

        let reopened = reopen(&mut archive);
        let names: Vec<_> = reopened.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["keep.bin"]);
    }

    #[test]
    fn test_rename_keeps_order_and_content() {
        let bytes = make_zip(&[("a.txt", b"a"), ("b.txt", b"b")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        archive.rename("a.txt", "a.md").unwrap();

        let mut reopened = reopen(&mut archive);
        let names: Vec<_> = reopened.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["a.md", "b.txt"]);
        assert_eq!(reopened.read("a.md").unwrap(), b"a");
    }

    #[test]
    fn test_rename_collision_rejected() {
        let bytes = make_zip(&[("a.txt", b"a"), ("b.txt", b"b")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        let err = archive.rename("a.txt", "b.txt").unwrap_err();
        assert!(matches!(err, Error::EntryExists { .. }));
    }

    #[test]
    fn test_rename_to_self_is_noop() {
        let bytes = make_zip(&[("a.txt", b"a")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        archive.rename("a.txt", "a.txt").unwrap();
        assert_eq!(archive.entries()[0].name, "a.txt");
    }

    #[test]
    fn test_missing_entry_errors() {
        let bytes = make_zip(&[("a.txt", b"a")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            archive.read("nope.txt").unwrap_err(),
            Error::EntryNotFound { .. }
        ));
        assert!(matches!(
            archive.remove("nope.txt").unwrap_err(),
            Error::EntryNotFound { .. }
        ));
    }

    #[test]
    fn test_directory_entries_survive_roundtrip() {
        let bytes = make_zip(&[("dir/", b""), ("dir/file.txt", b"x")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        archive.remove("dir/file.txt").unwrap();

        let reopened = reopen(&mut archive);
        let names: Vec<_> = reopened.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["dir/"]);
    }

    #[test]
    fn test_encoding_from_label() {
        assert!(encoding_from_label("shift_jis").is_ok());
        assert!(matches!(
            encoding_from_label("not-a-real-encoding").unwrap_err(),
            Error::InvalidEncoding { .. }
        ));
    }
}
