use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::platform::temp::tmp_name_in;

/// Hidden scratch path inside `dir` for an in-flight copy.
pub(super) fn unique_temp_path(dir: &Path) -> PathBuf {
    tmp_name_in(dir, "copy")
}

/// Persist directory entries (renames) on Unix; no-op elsewhere.
#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
