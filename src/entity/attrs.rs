//! Immutable attribute records produced by binding an entity.
//! Every field is read in one pass; any failure aborts the bind, so a record
//! is never partially populated.

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::FsError;

/// A local-time instant captured once; date and time strings derive from the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Local>);

impl Timestamp {
    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM:SS`
    pub fn time(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    pub fn as_datetime(&self) -> &DateTime<Local> {
        &self.0
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        Timestamp(DateTime::<Local>::from(t))
    }
}

/// Creation, modification and access instants of one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Times {
    pub created: Timestamp,
    pub modified: Timestamp,
    pub accessed: Timestamp,
}

impl Times {
    /// Filesystems without a birth time report the modification time as creation time.
    pub(crate) fn read(path: &Path, meta: &fs::Metadata) -> Result<Self, FsError> {
        let modified = meta
            .modified()
            .map_err(|e| FsError::attribute(path, "modification time", e))?;
        let accessed = meta
            .accessed()
            .map_err(|e| FsError::attribute(path, "access time", e))?;
        let created = match meta.created() {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::Unsupported => modified,
            Err(e) => return Err(FsError::attribute(path, "creation time", e)),
        };
        Ok(Times {
            created: created.into(),
            modified: modified.into(),
            accessed: accessed.into(),
        })
    }
}

/// Attributes of a bound file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    pub name: String,
    /// Name without its last extension.
    pub base_name: String,
    /// Last extension without the dot; empty when there is none.
    pub extension: String,
    pub parent_path: PathBuf,
    pub parent_name: String,
    pub owner: String,
    pub size: u64,
    /// Content-sniffed MIME type.
    pub mime_type: String,
    pub times: Times,
}

/// Attributes of a bound folder. `size` is the recursive sum of descendant file sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderAttributes {
    pub name: String,
    pub parent_path: PathBuf,
    pub parent_name: String,
    pub owner: String,
    pub size: u64,
    pub times: Times,
}

/// Make `path` absolute without resolving symlinks.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, FsError> {
    let abs = std::path::absolute(path)
        .map_err(|e| FsError::from_io("resolve absolute path", path, e))?;
    Ok(dunce::simplified(&abs).to_path_buf())
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Parent directory and its display name. A parent without a named segment
/// (a filesystem root) is named by its full root string.
pub(crate) fn parent_of(path: &Path) -> (PathBuf, String) {
    match path.parent() {
        Some(parent) => {
            let name = parent
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| parent.to_string_lossy().into_owned());
            (parent.to_path_buf(), name)
        }
        None => (path.to_path_buf(), path.to_string_lossy().into_owned()),
    }
}
