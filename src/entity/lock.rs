//! Two-phase "is this file locked" probe.
//!
//! Phase 1: open read/write and try a non-blocking exclusive advisory lock (fs2).
//! Phase 2: rename the file to a throwaway sibling and straight back, which
//! catches exclusive OS handles that ignore advisory locks.
//!
//! The lock is held by a guard and released on drop, on every exit path.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing::{debug, error, trace};

use crate::errors::FsError;
use crate::platform::temp::tmp_sibling_name;

/// RAII guard for the advisory lock taken during the probe.
struct ProbeLock {
    file: File,
}

impl ProbeLock {
    fn try_acquire(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        FileExt::try_lock_exclusive(&file)?;
        Ok(ProbeLock { file })
    }
}

impl Drop for ProbeLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock too; unlock first so the rename phase sees a free file.
        let _ = FileExt::unlock(&self.file);
    }
}

/// Returns Ok(true) when either phase fails.
/// Errors only if the file was moved away and could not be moved back.
pub(crate) fn probe_locked(path: &Path) -> Result<bool, FsError> {
    match ProbeLock::try_acquire(path) {
        Ok(guard) => drop(guard),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "advisory lock unavailable; reporting locked");
            return Ok(true);
        }
    }

    let parked = tmp_sibling_name(path, "lockprobe");
    if let Err(e) = fs::rename(path, &parked) {
        debug!(path = %path.display(), error = %e, "rename probe failed; reporting locked");
        return Ok(true);
    }
    if let Err(e) = fs::rename(&parked, path) {
        error!(
            path = %path.display(),
            parked = %parked.display(),
            error = %e,
            "failed to restore file after rename probe"
        );
        return Err(FsError::from_io("restore file after lock probe", path, e));
    }
    trace!(path = %path.display(), "file not locked");
    Ok(false)
}
