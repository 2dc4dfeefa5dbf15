//! Unix implementations of platform helpers.

use std::ffi::CStr;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Unix hidden convention: the final segment starts with a dot.
pub fn is_hidden(path: &Path) -> io::Result<bool> {
    Ok(path
        .file_name()
        .map(|n| n.as_encoded_bytes().first() == Some(&b'.'))
        .unwrap_or(false))
}

/// Resolve the owning user of `meta` to a login name.
/// Falls back to the numeric uid when the passwd database has no entry.
pub fn owner_name(_path: &Path, meta: &fs::Metadata) -> io::Result<String> {
    let uid = meta.uid();
    Ok(user_name(uid)?.unwrap_or_else(|| uid.to_string()))
}

fn user_name(uid: libc::uid_t) -> io::Result<Option<String>> {
    let mut buf: Vec<libc::c_char> = vec![0; 1024];
    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::uninit();
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid, pwd.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf.len() < 1 << 20 {
            let grown = buf.len() * 2;
            buf.resize(grown, 0);
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        // SAFETY: getpwuid_r succeeded and `result` points into `pwd`/`buf`, both alive here.
        let name = unsafe { CStr::from_ptr((*result).pw_name) };
        return Ok(Some(name.to_string_lossy().into_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        // Mode should remain 0640 (not forced to 0600) because file pre-existed.
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new_log.txt");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }

    #[test]
    fn dot_names_are_hidden() {
        assert!(is_hidden(Path::new("/tmp/t/.hidden")).unwrap());
        assert!(!is_hidden(Path::new("/tmp/t/x")).unwrap());
        assert!(!is_hidden(Path::new("/")).unwrap());
    }

    #[test]
    fn owner_of_new_file_is_current_user() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mine.txt");
        fs::write(&path, b"x").unwrap();
        let meta = fs::metadata(&path).unwrap();
        let expected = user_name(unsafe { libc::geteuid() })
            .unwrap()
            .unwrap_or_else(|| meta.uid().to_string());
        assert_eq!(owner_name(&path, &meta).unwrap(), expected);
    }
}
