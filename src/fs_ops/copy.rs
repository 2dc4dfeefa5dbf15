//! Bulk copy: copy each source into a destination directory and partition the
//! outcomes into succeeded, failed and skipped.
//!
//! Per source:
//! - missing source -> failed; a symlink whose target is missing counts as missing
//! - pipe, socket or device -> failed, also when found inside a copied tree
//! - destination exists and `replace` is off -> skipped (neither succeeded nor failed)
//! - otherwise copy (directories recursively), then optionally delete the source
//!
//! Files are streamed into a temp sibling and renamed into place, so a reader
//! never sees a half-written destination. A failing source never stops the
//! remaining ones; only a shutdown request does, and then every unprocessed
//! source is reported as interrupted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help_io;
use super::io_copy::copy_streaming;
use super::{metadata, util};
use crate::errors::{Failure, FsError};
use crate::shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Overwrite an existing destination instead of skipping the source.
    pub replace: bool,
    /// Remove each source after it was copied successfully.
    pub delete_source: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            replace: true,
            delete_source: false,
        }
    }
}

/// Outcome of [`copy_into`], each list in input order.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<Failure>,
    pub skipped: Vec<PathBuf>,
}

impl CopyReport {
    pub fn failed_paths(&self) -> impl Iterator<Item = &Path> {
        self.failed.iter().map(|f| f.path.as_path())
    }
}

enum Outcome {
    Copied { bytes: u64 },
    Skipped,
}

/// Copy every path in `sources` into `dest_dir` (created on demand).
pub fn copy_into<P: AsRef<Path>>(sources: &[P], dest_dir: &Path, opts: &CopyOptions) -> CopyReport {
    let mut report = CopyReport::default();
    let mut bytes_total: u64 = 0;

    for (idx, src) in sources.iter().enumerate() {
        let src = src.as_ref();
        if shutdown::is_requested() {
            warn!(remaining = sources.len() - idx, "copy interrupted");
            report.failed.extend(
                sources[idx..]
                    .iter()
                    .map(|s| Failure::new(s.as_ref(), FsError::Interrupted)),
            );
            break;
        }

        match copy_one(src, dest_dir, opts) {
            Ok(Outcome::Copied { bytes }) => {
                bytes_total = bytes_total.saturating_add(bytes);
                if opts.delete_source {
                    remove_source(src);
                }
                report.succeeded.push(src.to_path_buf());
            }
            Ok(Outcome::Skipped) => {
                debug!(src = %src.display(), "destination exists; skipped");
                report.skipped.push(src.to_path_buf());
            }
            Err(error) => {
                warn!(src = %src.display(), code = error.code(), error = %error, "copy failed");
                report.failed.push(Failure::new(src, error));
            }
        }
    }

    info!(
        dest = %dest_dir.display(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        bytes = bytes_total,
        "copy finished"
    );
    report
}

fn copy_one(src: &Path, dest_dir: &Path, opts: &CopyOptions) -> Result<Outcome, FsError> {
    let src_meta = fs::symlink_metadata(src).map_err(|e| FsError::from_io("stat source", src, e))?;
    if src_meta.file_type().is_symlink()
        && let Err(e) = fs::metadata(src)
    {
        return Err(FsError::from_io("resolve source link", src, e));
    }
    reject_special(src, &src_meta)?;
    let name = src.file_name().ok_or_else(|| FsError::Io {
        op: "copy",
        path: src.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "source has no final path segment"),
    })?;
    let dest = dest_dir.join(name);

    let existing = fs::symlink_metadata(&dest).ok();
    if existing.is_some() && !opts.replace {
        return Ok(Outcome::Skipped);
    }
    reject_overlap(src, &src_meta, dest_dir, &dest)?;

    fs::create_dir_all(dest_dir)
        .map_err(|e| FsError::from_io("create destination directory", dest_dir, e))?;

    // A kind change (file over dir or dir over file) needs the old entry gone first.
    if let Some(old) = existing
        && old.is_dir() != src_meta.is_dir()
    {
        let removed = if old.is_dir() {
            fs::remove_dir_all(&dest)
        } else {
            fs::remove_file(&dest)
        };
        removed.map_err(|e| FsError::from_io("remove replaced destination", &dest, e))?;
    }

    let bytes = if src_meta.is_dir() {
        copy_dir(src, &dest)?
    } else {
        copy_entry(src, &src_meta, &dest).map_err(|e| FsError::from_io("copy file", src, e))?
    };
    debug!(src = %src.display(), dest = %dest.display(), bytes, "copied");
    Ok(Outcome::Copied { bytes })
}

/// Only directories, regular files and symlinks have a copyable form.
/// Reading a FIFO would block until a writer shows up.
fn reject_special(path: &Path, meta: &fs::Metadata) -> Result<(), FsError> {
    let ft = meta.file_type();
    if ft.is_dir() || ft.is_file() || ft.is_symlink() {
        return Ok(());
    }
    Err(FsError::Io {
        op: "copy",
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
    })
}

/// Refuse copying an entry onto itself or a directory into its own subtree.
fn reject_overlap(src: &Path, src_meta: &fs::Metadata, dest_dir: &Path, dest: &Path) -> Result<(), FsError> {
    let Ok(src_real) = fs::canonicalize(src) else {
        return Ok(());
    };
    let dest_real = resolve_existing_prefix(dest);
    let dest_dir_real = resolve_existing_prefix(dest_dir);
    let overlap = if src_meta.is_dir() {
        dest_dir_real.starts_with(&src_real) || dest_real == src_real
    } else {
        dest_real == src_real
    };
    if overlap {
        return Err(FsError::Io {
            op: "copy",
            path: src.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination '{}' overlaps the source", dest.display()),
            ),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing ancestor and re-append the missing tail.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut tail = Vec::new();
    let mut cur = abs.as_path();
    loop {
        if let Ok(real) = fs::canonicalize(cur) {
            return tail.iter().rev().fold(real, |acc: PathBuf, part| acc.join(part));
        }
        match (cur.parent(), cur.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                cur = parent;
            }
            _ => return abs,
        }
    }
}

/// Copy one non-directory entry. Symlinks are recreated as links on Unix.
fn copy_entry(src: &Path, meta: &fs::Metadata, dest: &Path) -> io::Result<u64> {
    #[cfg(unix)]
    if meta.file_type().is_symlink() {
        let target = fs::read_link(src).map_err(io_error_with_help_io("read link", src))?;
        match fs::remove_file(dest) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                return Err(io_error_with_help_io("remove existing link", dest)(e));
            }
            _ => {}
        }
        std::os::unix::fs::symlink(&target, dest).map_err(io_error_with_help_io("create link", dest))?;
        return Ok(0);
    }

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = util::unique_temp_path(dir);
    let bytes = copy_streaming(src, &tmp)
        .map_err(io_error_with_help_io("copy to temporary file", &tmp));
    let bytes = match bytes {
        Ok(b) => b,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
    };
    metadata::preserve_metadata(&tmp, meta);
    metadata::preserve_xattrs(src, &tmp);
    if let Err(e) = try_atomic_move(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(bytes)
}

/// Recursive copy. Existing directories at the destination are merged into.
/// Directory permissions and times are applied last, deepest first, so a
/// read-only source directory does not block writing its children.
fn copy_dir(src: &Path, dest: &Path) -> Result<u64, FsError> {
    let mut bytes: u64 = 0;
    let mut dirs: Vec<(PathBuf, PathBuf, fs::Metadata)> = Vec::new();

    for item in WalkDir::new(src).follow_links(false) {
        if shutdown::is_requested() {
            return Err(FsError::Interrupted);
        }
        let entry = item.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            FsError::from_io("read source tree", &path, e.into())
        })?;
        let rel = entry.path().strip_prefix(src).map_err(|e| FsError::Io {
            op: "copy directory",
            path: entry.path().to_path_buf(),
            source: io::Error::other(e),
        })?;
        let target = dest.join(rel);
        let meta = entry
            .metadata()
            .map_err(|e| FsError::from_io("stat source entry", entry.path(), e.into()))?;

        if meta.is_dir() {
            fs::create_dir_all(&target).map_err(|e| FsError::from_io("create directory", &target, e))?;
            dirs.push((entry.path().to_path_buf(), target, meta));
        } else {
            reject_special(entry.path(), &meta)?;
            let n = copy_entry(entry.path(), &meta, &target)
                .map_err(|e| FsError::from_io("copy file", entry.path(), e))?;
            bytes = bytes.saturating_add(n);
        }
    }

    for (src_dir, dest_dir, meta) in dirs.iter().rev() {
        metadata::preserve_xattrs(src_dir, dest_dir);
        metadata::preserve_permissions(dest_dir, meta);
        metadata::preserve_times(dest_dir, meta);
    }
    Ok(bytes)
}

/// Delete a copied source. A failure here leaves the copy counted as succeeded.
fn remove_source(src: &Path) {
    let result = match fs::symlink_metadata(src) {
        Ok(m) if m.is_dir() => fs::remove_dir_all(src),
        Ok(_) => fs::remove_file(src),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => debug!(src = %src.display(), "source removed after copy"),
        Err(e) => warn!(src = %src.display(), error = %e, "copied but failed to remove source"),
    }
}
