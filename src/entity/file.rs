//! File entity: a snapshot of one regular (non-directory) path.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::attrs::{self, FileAttributes, Times};
use super::lock::probe_locked;
use super::sniff::{Probe, SystemProbe, special_mime};
use super::{rename_target, undo_rename, verify_removed};
use crate::errors::{EntryKind, FsError};

#[derive(Debug)]
pub struct FileEntity<P = SystemProbe> {
    path: PathBuf,
    attrs: FileAttributes,
    probe: P,
}

impl FileEntity {
    /// Bind to `path` using the OS-backed probe.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, FsError> {
        Self::bind_with(path, SystemProbe)
    }
}

impl<P: Probe> FileEntity<P> {
    /// Bind to `path`, reading owner and content type through `probe`.
    /// Fails with `NotFound`, `WrongKind` (a directory) or `AttributeRead`.
    pub fn bind_with(path: impl AsRef<Path>, probe: P) -> Result<Self, FsError> {
        let path = attrs::absolute(path.as_ref())?;
        let attrs = read_attributes(&path, &probe)?;
        debug!(path = %path.display(), size = attrs.size, mime = %attrs.mime_type, "bound file");
        Ok(Self { path, attrs, probe })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn attributes(&self) -> &FileAttributes {
        &self.attrs
    }

    /// The bound path still exists and is not a directory.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|m| !m.is_dir())
    }

    /// Current on-disk size is zero.
    pub fn is_empty(&self) -> Result<bool, FsError> {
        let meta = fs::metadata(&self.path)
            .map_err(|e| FsError::from_io("read file size", &self.path, e))?;
        Ok(meta.len() == 0)
    }

    /// Rename within the same directory and re-snapshot under the new path.
    /// On failure the entity stays bound to its original path and an existing
    /// sibling named `new_name` is left untouched.
    pub fn rename(&mut self, new_name: &str) -> Result<(), FsError> {
        let target = rename_target(&self.path, new_name)?;
        fs::rename(&self.path, &target)
            .map_err(|e| FsError::from_io("rename file", &self.path, e))?;
        let attrs = match read_attributes(&target, &self.probe) {
            Ok(attrs) => attrs,
            Err(err) => return Err(undo_rename(&target, &self.path, err)),
        };
        info!(from = %self.path.display(), to = %target.display(), "renamed file");
        self.path = target;
        self.attrs = attrs;
        Ok(())
    }

    /// Two-phase lock probe; see [`crate::entity::lock`].
    pub fn is_locked(&self) -> Result<bool, FsError> {
        probe_locked(&self.path)
    }

    /// Remove the file. Succeeds only when the path is verified gone afterwards.
    pub fn delete(&self) -> Result<(), FsError> {
        fs::remove_file(&self.path).map_err(|e| FsError::from_io("delete file", &self.path, e))?;
        verify_removed(&self.path)?;
        info!(path = %self.path.display(), "deleted file");
        Ok(())
    }
}

fn read_attributes<P: Probe>(path: &Path, probe: &P) -> Result<FileAttributes, FsError> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
        _ => FsError::attribute(path, "metadata", e),
    })?;
    if meta.is_dir() {
        return Err(FsError::WrongKind {
            path: path.to_path_buf(),
            expected: EntryKind::File,
        });
    }

    let (parent_path, parent_name) = attrs::parent_of(path);
    let owner = probe
        .owner_name(path, &meta)
        .map_err(|e| FsError::attribute(path, "owner", e))?;
    let mime_type = if meta.is_file() {
        probe
            .detect_type(path)
            .map_err(|e| FsError::attribute(path, "content type", e))?
    } else {
        special_mime(&meta).to_string()
    };
    let times = Times::read(path, &meta)?;

    Ok(FileAttributes {
        name: attrs::file_name_of(path),
        base_name: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        parent_path,
        parent_name,
        owner,
        size: meta.len(),
        mime_type,
        times,
    })
}
