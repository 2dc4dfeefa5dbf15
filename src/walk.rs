//! Depth-first tree visitation with per-entry failure tracking.
//!
//! Ordering:
//! - Files are reported when encountered.
//! - Directories are reported after their whole subtree (post-order).
//! - The root is the starting point and is never reported.
//!
//! Hidden entries are skipped together with their subtree when `show_hidden` is false.
//! A failure on one entry (unreadable directory, failed hidden check) is reported
//! as `Visit::Failed` and the walk continues with its siblings.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::{Failure, FsError};
use crate::platform;
use crate::shutdown;

/// Type of a visited entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl From<fs::FileType> for VisitKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            VisitKind::Symlink
        } else if ft.is_dir() {
            VisitKind::Directory
        } else if ft.is_file() {
            VisitKind::File
        } else {
            VisitKind::Other
        }
    }
}

/// One event produced by [`visit`].
#[derive(Debug)]
pub enum Visit {
    Entry { path: PathBuf, kind: VisitKind },
    Failed(Failure),
}

/// Outcome of one [`walk`]: successfully visited paths and failed ones, in walk order.
#[derive(Debug, Default)]
pub struct VisitResult {
    pub visited: Vec<PathBuf>,
    pub failed: Vec<Failure>,
    pub show_hidden: bool,
}

impl VisitResult {
    pub fn failed_paths(&self) -> impl Iterator<Item = &Path> {
        self.failed.iter().map(|f| f.path.as_path())
    }
}

/// Walk `root` and collect every event into a [`VisitResult`].
pub fn walk(root: &Path, show_hidden: bool) -> Result<VisitResult, FsError> {
    let mut result = VisitResult {
        show_hidden,
        ..Default::default()
    };
    visit(root, show_hidden, |event| match event {
        Visit::Entry { path, .. } => result.visited.push(path),
        Visit::Failed(failure) => result.failed.push(failure),
    })?;
    debug!(
        root = %root.display(),
        visited = result.visited.len(),
        failed = result.failed.len(),
        show_hidden,
        "walk finished"
    );
    Ok(result)
}

/// Walk `root` depth-first, handing each event to `on_event` in final order.
///
/// Errors only when the walk cannot start (root missing, not a directory, unlistable),
/// when listing the root itself breaks off, or when a shutdown is requested mid-walk.
pub fn visit<F>(root: &Path, show_hidden: bool, mut on_event: F) -> Result<(), FsError>
where
    F: FnMut(Visit),
{
    ensure_walkable(root)?;

    let mut it = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();
    // Directories whose subtree is still open, innermost last.
    let mut pending: Vec<(usize, PathBuf)> = Vec::new();

    while let Some(item) = it.next() {
        if shutdown::is_requested() {
            return Err(FsError::Interrupted);
        }
        match item {
            Ok(entry) => {
                flush_closed_dirs(&mut pending, entry.depth(), &mut on_event);
                let kind = VisitKind::from(entry.file_type());

                if !show_hidden {
                    match platform::is_hidden(entry.path()) {
                        Ok(false) => {}
                        Ok(true) => {
                            trace!(path = %entry.path().display(), "skipping hidden entry");
                            if kind == VisitKind::Directory {
                                it.skip_current_dir();
                            }
                            continue;
                        }
                        Err(e) => {
                            let error = FsError::from_io("check hidden flag", entry.path(), e);
                            if kind == VisitKind::Directory {
                                it.skip_current_dir();
                            }
                            on_event(Visit::Failed(Failure::new(entry.into_path(), error)));
                            continue;
                        }
                    }
                }

                if kind == VisitKind::Directory {
                    pending.push((entry.depth(), entry.into_path()));
                } else {
                    on_event(Visit::Entry {
                        path: entry.into_path(),
                        kind,
                    });
                }
            }
            Err(err) => {
                let located = match err.path() {
                    Some(p) => Some(p.to_path_buf()),
                    None => listing_dir(&pending, err.depth()).map(|i| pending[i].1.clone()),
                };
                let path = match located {
                    Some(p) if p != root => p,
                    _ => {
                        return Err(FsError::StructuralWalk {
                            path: root.to_path_buf(),
                            reason: format!("listing failed: {err}"),
                        });
                    }
                };
                // A directory whose listing failed is reported as failed, not visited.
                if let Some(pos) = pending.iter().rposition(|(_, p)| *p == path) {
                    pending.remove(pos);
                }
                let error = FsError::from_io("read directory entry", &path, err.into());
                trace!(path = %path.display(), error = %error, "entry failed");
                on_event(Visit::Failed(Failure::new(path, error)));
            }
        }
    }

    flush_closed_dirs(&mut pending, 0, &mut on_event);
    Ok(())
}

/// Index of the open directory an entry-less error at `depth` came from.
/// Entries read from a directory sit one level below it; `None` means the root.
fn listing_dir(pending: &[(usize, PathBuf)], depth: usize) -> Option<usize> {
    pending.iter().rposition(|(d, _)| *d < depth)
}

/// Emit every pending directory at `depth` or deeper; their subtrees are complete.
fn flush_closed_dirs<F>(pending: &mut Vec<(usize, PathBuf)>, depth: usize, on_event: &mut F)
where
    F: FnMut(Visit),
{
    while pending.last().is_some_and(|(d, _)| *d >= depth) {
        if let Some((_, path)) = pending.pop() {
            on_event(Visit::Entry {
                path,
                kind: VisitKind::Directory,
            });
        }
    }
}

fn ensure_walkable(root: &Path) -> Result<(), FsError> {
    let structural = |reason: String| FsError::StructuralWalk {
        path: root.to_path_buf(),
        reason,
    };
    let meta = fs::metadata(root).map_err(|e| structural(format!("cannot stat root: {e}")))?;
    if !meta.is_dir() {
        return Err(structural("root is not a directory".into()));
    }
    fs::read_dir(root).map_err(|e| structural(format!("cannot list root: {e}")))?;
    Ok(())
}
