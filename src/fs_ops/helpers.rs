//! Enrich io::Error with the operation, the path and a platform-aware hint.
//!
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;  // anyhow
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;             // io::Result

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and mode bits"),
            libc::ENOENT => Some("path not found"),
            libc::EEXIST => Some("already exists"),
            libc::ENOSPC => Some("no space left on device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ELOOP => Some("too many symlink levels; possible cycle"),
            libc::ENAMETOOLONG => Some("name or path too long"),
            libc::EXDEV => Some("crosses filesystems"),
            libc::EBUSY => Some("resource busy"),
            libc::EMFILE | libc::ENFILE => Some("too many open files"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    #[cfg(windows)]
    if let Some(code) = e.raw_os_error() {
        // Win32 error codes
        let hint = match code {
            5 => Some("access denied"),
            2 | 3 => Some("path not found"),
            32 | 33 => Some("file is in use by another process"),
            80 | 183 => Some("already exists"),
            112 => Some("disk full"),
            206 => Some("name or path too long"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// `.map_err` adapter producing an anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// `.map_err` adapter that keeps the io::ErrorKind and rewrites only the message.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
