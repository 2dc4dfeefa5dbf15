//! Platform capabilities consumed by entity binding: content-type detection and
//! owner resolution. The default [`SystemProbe`] sniffs magic bytes with `infer`
//! and asks the OS for the owner; tests and embedders can supply their own.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::platform;

const SNIFF_LEN: u64 = 8192;
const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain";

pub trait Probe {
    /// MIME type of the file content at `path`.
    fn detect_type(&self, path: &Path) -> io::Result<String>;

    /// Name of the OS principal owning `path`.
    fn owner_name(&self, path: &Path, meta: &fs::Metadata) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn detect_type(&self, path: &Path) -> io::Result<String> {
        sniff_mime(path)
    }

    fn owner_name(&self, path: &Path, meta: &fs::Metadata) -> io::Result<String> {
        platform::owner_name(path, meta)
    }
}

/// Detect a MIME type from the first bytes of a file.
/// Known magic numbers win; otherwise NUL-free UTF-8 is `text/plain`
/// and anything else (including empty files) is `application/octet-stream`.
/// Non-regular files are never opened; see [`special_mime`].
pub fn sniff_mime(path: &Path) -> io::Result<String> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Ok(special_mime(&meta).to_string());
    }
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

    if let Some(kind) = infer::get(&head) {
        return Ok(kind.mime_type().to_string());
    }
    if !head.is_empty() && looks_like_text(&head) {
        return Ok(TEXT_PLAIN.to_string());
    }
    Ok(OCTET_STREAM.to_string())
}

/// Fixed type for entries without readable content: pipes, sockets, devices.
/// Opening a FIFO for reading blocks until a writer appears.
pub fn special_mime(meta: &fs::Metadata) -> &'static str {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        let ft = meta.file_type();
        if ft.is_fifo() {
            return "inode/fifo";
        }
        if ft.is_socket() {
            return "inode/socket";
        }
        if ft.is_char_device() {
            return "inode/chardevice";
        }
        if ft.is_block_device() {
            return "inode/blockdevice";
        }
    }
    #[cfg(not(unix))]
    let _ = meta;
    OCTET_STREAM
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte character cut off by the sniff window is still text.
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn png_magic_is_detected() {
        let td = tempdir().unwrap();
        let p = td.path().join("image.bin");
        fs::write(&p, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D]).unwrap();
        assert_eq!(sniff_mime(&p).unwrap(), "image/png");
    }

    #[test]
    fn utf8_text_is_plain_text() {
        let td = tempdir().unwrap();
        let p = td.path().join("notes");
        fs::write(&p, "héllo wörld\n").unwrap();
        assert_eq!(sniff_mime(&p).unwrap(), "text/plain");
    }

    #[test]
    fn binary_and_empty_are_octet_stream() {
        let td = tempdir().unwrap();
        let bin = td.path().join("blob");
        fs::write(&bin, [0u8, 1, 2, 3, 0xff]).unwrap();
        assert_eq!(sniff_mime(&bin).unwrap(), OCTET_STREAM);

        let empty = td.path().join("empty");
        fs::write(&empty, b"").unwrap();
        assert_eq!(sniff_mime(&empty).unwrap(), OCTET_STREAM);
    }

    #[test]
    fn truncated_multibyte_char_still_text() {
        assert!(looks_like_text(&[b'a', 0xC3]));
        assert!(!looks_like_text(&[b'a', 0xFF, b'b']));
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_typed_without_reading() {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let td = tempdir().unwrap();
        let p = td.path().join("pipe");
        let c = CString::new(p.as_os_str().as_bytes()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c.as_ptr(), 0o644) }, 0);
        assert_eq!(sniff_mime(&p).unwrap(), "inode/fifo");
    }
}
