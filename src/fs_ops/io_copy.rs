//! Streaming copy of one file into a freshly created destination.
//!
//! The destination is opened with `create_new`, so an existing file is never
//! clobbered here; callers copy into a unique temp name and rename afterwards.
//! The source is read once to EOF: bytes appended concurrently are not included.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` into new file `dst` and `sync_all` it. Returns bytes written.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    let dst_f = opts.open(dst)?;

    #[cfg(target_os = "linux")]
    if let Some(bytes) = copy_in_kernel(&src_f, &dst_f)? {
        dst_f.sync_all()?;
        return Ok(bytes);
    }

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}

/// `copy_file_range` fast path. `Ok(None)` means unsupported here and nothing
/// was written, so the caller should stream instead.
#[cfg(target_os = "linux")]
fn copy_in_kernel(src: &File, dst: &File) -> io::Result<Option<u64>> {
    use std::os::unix::io::AsRawFd;

    const CHUNK: usize = 16 * 1024 * 1024;
    let mut total: u64 = 0;
    loop {
        // SAFETY: both descriptors are open for the duration of the call; null offsets use file positions.
        let rc = unsafe {
            libc::copy_file_range(
                src.as_raw_fd(),
                std::ptr::null_mut(),
                dst.as_raw_fd(),
                std::ptr::null_mut(),
                CHUNK,
                0,
            )
        };
        match rc {
            n if n > 0 => total += n as u64,
            0 => return Ok(Some(total)),
            _ => {
                let err = io::Error::last_os_error();
                let unsupported = matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EPERM | libc::EOPNOTSUPP)
                );
                if total == 0 && unsupported {
                    return Ok(None);
                }
                return Err(err);
            }
        }
    }
}
