/// Directory listing and modification-time lookup.
///
/// Split into two calls because the loop only needs the mtime of entries
/// whose name already matched the pattern.
use crate::error::ListingError;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// File name for matching and logging; lossy if not valid UTF-8.
    pub name: String,
    /// Full path of the entry, byte-exact.
    pub path: PathBuf,
}

impl ListedEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

pub trait DirLister: Send + Sync {
    /// All entries in `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<ListedEntry>, ListingError>;

    /// Local modification time of the entry at `path`.
    fn modified(&self, path: &Path) -> io::Result<NaiveDateTime>;
}

/// Lists the real filesystem with `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirLister for FsLister {
    /// Names are returned sorted so discovery order does not depend on the
    /// filesystem's enumeration order.
    fn list(&self, dir: &Path) -> Result<Vec<ListedEntry>, ListingError> {
        let to_listing_error = |source: io::Error| ListingError {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(to_listing_error)? {
            let entry = entry.map_err(to_listing_error)?;
            entries.push(ListedEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        entries.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> io::Result<NaiveDateTime> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Local>::from(modified).naive_local())
    }
}
