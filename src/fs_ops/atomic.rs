//! Rename a finished temp file over its destination.
//! Windows `rename` refuses to overwrite, so an existing file is removed first.
//! On Unix the destination directory is fsynced afterwards (best-effort).

use std::fs;
use std::io;
use std::path::Path;

use super::helpers::io_error_with_help_io;

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    if let Err(e) = fs::remove_file(dst)
        && e.kind() != io::ErrorKind::NotFound
    {
        return Err(io_error_with_help_io("remove existing destination", dst)(e));
    }

    fs::rename(src, dst).map_err(io_error_with_help_io("rename into place", dst))?;

    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
