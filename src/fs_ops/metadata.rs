//! Carry timestamps, permissions and (optionally) xattrs from a source onto its copy.
//! All of it is best-effort: failures are logged and never fail the copy.

use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Apply `src_meta`'s atime/mtime and permissions to `dest`.
pub(super) fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    preserve_permissions(dest, src_meta);
    preserve_times(dest, src_meta);
}

/// Times only. Directories get this after their contents are written,
/// since adding children bumps mtime.
pub(super) fn preserve_times(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    match filetime::set_file_times(dest, at, mt) {
        Ok(()) => trace!(path = %dest.display(), "set atime/mtime"),
        Err(e) => warn!(path = %dest.display(), error = %e, "failed to set atime/mtime"),
    }
}

pub(super) fn preserve_permissions(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    let perms = {
        use std::os::unix::fs::PermissionsExt;
        fs::Permissions::from_mode(src_meta.permissions().mode() & 0o7777)
    };
    #[cfg(not(unix))]
    let perms = match fs::metadata(dest) {
        Ok(meta) => {
            let mut p = meta.permissions();
            p.set_readonly(src_meta.permissions().readonly());
            p
        }
        Err(e) => {
            warn!(path = %dest.display(), error = %e, "failed to stat destination for permissions");
            return;
        }
    };
    if let Err(e) = fs::set_permissions(dest, perms) {
        warn!(path = %dest.display(), error = %e, "failed to set permissions");
    }
}

/// Copy extended attributes when built with the `xattrs` feature.
pub(super) fn preserve_xattrs(src: &Path, dest: &Path) {
    #[cfg(feature = "xattrs")]
    {
        let names = match xattr::list(src) {
            Ok(names) => names,
            Err(e) => {
                warn!(src = %src.display(), error = %e, "failed to list xattrs");
                return;
            }
        };
        for name in names {
            let shown = name.to_string_lossy();
            match xattr::get(src, &name) {
                Ok(value) => {
                    let value = value.unwrap_or_default();
                    if let Err(e) = xattr::set(dest, &name, &value) {
                        warn!(dest = %dest.display(), xattr = %shown, error = %e, "failed to set xattr");
                    } else {
                        trace!(dest = %dest.display(), xattr = %shown, size = value.len(), "preserved xattr");
                    }
                }
                Err(e) => warn!(src = %src.display(), xattr = %shown, error = %e, "failed to read xattr"),
            }
        }
    }
    #[cfg(not(feature = "xattrs"))]
    {
        let _ = (src, dest);
    }
}
