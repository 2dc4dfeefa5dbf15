//! Entity attribute model: files and folders bound to a path, with their
//! attributes captured once at bind time.

mod attrs;
mod file;
mod folder;
pub(crate) mod lock;
mod sniff;

pub use attrs::{FileAttributes, FolderAttributes, Timestamp, Times};
pub use file::FileEntity;
pub use folder::{FolderEntity, ListKind};
pub use sniff::{Probe, SystemProbe, sniff_mime};

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::error;

use crate::errors::FsError;

/// Sibling of `current` named `new_name`. The name must be a single normal
/// path segment and must not already exist.
pub(crate) fn rename_target(current: &Path, new_name: &str) -> Result<PathBuf, FsError> {
    let invalid = |why: &str| FsError::Io {
        op: "rename",
        path: current.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, format!("'{new_name}' {why}")),
    };
    let mut components = Path::new(new_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid("is not a single file name")),
    }
    let parent = current
        .parent()
        .ok_or_else(|| invalid("cannot be applied to a filesystem root"))?;
    let target = parent.join(new_name);
    if target != current && fs::symlink_metadata(&target).is_ok() {
        return Err(FsError::Io {
            op: "rename",
            path: current.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{}' already exists", target.display()),
            ),
        });
    }
    Ok(target)
}

/// Move `target` back to `original` after the re-snapshot of a rename failed,
/// and return the snapshot error.
pub(crate) fn undo_rename(target: &Path, original: &Path, err: FsError) -> FsError {
    if let Err(e) = fs::rename(target, original) {
        error!(
            from = %target.display(),
            to = %original.display(),
            error = %e,
            "could not restore name after failed rename"
        );
    }
    err
}

/// Confirm a removed path is really gone.
pub(crate) fn verify_removed(path: &Path) -> Result<(), FsError> {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::from_io("verify removal", path, e)),
        Ok(_) => Err(FsError::Io {
            op: "verify removal",
            path: path.to_path_buf(),
            source: io::Error::other("path still exists after removal"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_target_joins_with_host_separator() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("a.txt");
        let target = rename_target(&current, "b.txt").unwrap();
        assert_eq!(target, dir.path().join("b.txt"));
    }

    #[test]
    fn rename_target_rejects_multi_segment_names() {
        let current = Path::new("/data/a.txt");
        for bad in ["", ".", "..", "x/y", "/abs"] {
            assert!(rename_target(current, bad).is_err(), "accepted {bad:?}");
        }
    }
}
