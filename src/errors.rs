//! Typed error definitions for fs_inspect.
//! Structural failures (binding an entity, starting a walk) surface as hard errors;
//! per-entry failures during walks and copies are carried inside `Failure` records.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which kind of filesystem object an operation expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Expected a {expected} at {path}")]
    WrongKind { path: PathBuf, expected: EntryKind },

    #[error("Failed to read {attribute} of {path}: {source}")]
    AttributeRead {
        path: PathBuf,
        attribute: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("Cannot walk {path}: {reason}")]
    StructuralWalk { path: PathBuf, reason: String },

    #[error("{op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl FsError {
    /// Classify an io::Error raised while performing `op` on `path`.
    pub fn from_io(op: &'static str, path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.to_path_buf(),
                context: format!("{op}: {e}"),
            },
            _ => FsError::Io {
                op,
                path: path.to_path_buf(),
                source: e,
            },
        }
    }

    /// Wrap an attribute read failure; the whole bind is aborted with it.
    pub(crate) fn attribute(path: &Path, attribute: &'static str, source: io::Error) -> Self {
        FsError::AttributeRead {
            path: path.to_path_buf(),
            attribute,
            source,
        }
    }

    /// Stable short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            FsError::NotFound(_) => "not_found",
            FsError::WrongKind { .. } => "wrong_kind",
            FsError::AttributeRead { .. } => "attribute_read",
            FsError::PermissionDenied { .. } => "permission_denied",
            FsError::StructuralWalk { .. } => "structural_walk",
            FsError::Io { .. } => "io",
            FsError::Interrupted => "interrupted",
        }
    }
}

/// One path that a multi-entry operation could not process, with its cause.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: FsError,
}

impl Failure {
    pub fn new(path: impl Into<PathBuf>, error: FsError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}
