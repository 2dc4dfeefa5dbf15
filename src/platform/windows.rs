//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Owner lookup reads the security descriptor and resolves the SID to `DOMAIN\user`.
//! - Hidden detection uses FILE_ATTRIBUTE_HIDDEN, not the dot-prefix convention.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::fs::MetadataExt;
use std::path::Path;

use windows_sys::Win32::{
    Foundation::{ERROR_SUCCESS, LocalFree},
    Security::Authorization::{GetNamedSecurityInfoW, SE_FILE_OBJECT},
    Security::{LookupAccountSidW, OWNER_SECURITY_INFORMATION},
    Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN,
};

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn is_hidden(path: &Path) -> io::Result<bool> {
    let meta = fs::symlink_metadata(path)?;
    Ok(meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

pub fn owner_name(path: &Path, _meta: &fs::Metadata) -> io::Result<String> {
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let mut owner = std::ptr::null_mut();
    let mut descriptor = std::ptr::null_mut();
    let rc = unsafe {
        GetNamedSecurityInfoW(
            wide.as_ptr(),
            SE_FILE_OBJECT,
            OWNER_SECURITY_INFORMATION,
            &mut owner,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            &mut descriptor,
        )
    };
    if rc != ERROR_SUCCESS {
        return Err(io::Error::from_raw_os_error(rc as i32));
    }
    let name = lookup_account(owner);
    // `owner` points into `descriptor`; free only after the lookup.
    unsafe { LocalFree(descriptor as _) };
    name
}

fn lookup_account(sid: *mut core::ffi::c_void) -> io::Result<String> {
    let mut name_len: u32 = 0;
    let mut domain_len: u32 = 0;
    let mut sid_use = 0;
    // First call sizes the buffers.
    unsafe {
        LookupAccountSidW(
            std::ptr::null(),
            sid,
            std::ptr::null_mut(),
            &mut name_len,
            std::ptr::null_mut(),
            &mut domain_len,
            &mut sid_use,
        )
    };
    if name_len == 0 {
        return Err(io::Error::last_os_error());
    }
    let mut name = vec![0u16; name_len as usize];
    let mut domain = vec![0u16; domain_len.max(1) as usize];
    let ok = unsafe {
        LookupAccountSidW(
            std::ptr::null(),
            sid,
            name.as_mut_ptr(),
            &mut name_len,
            domain.as_mut_ptr(),
            &mut domain_len,
            &mut sid_use,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    name.truncate(name_len as usize);
    domain.truncate(domain_len as usize);
    let name = String::from_utf16_lossy(&name);
    if domain.is_empty() {
        Ok(name)
    } else {
        Ok(format!("{}\\{}", String::from_utf16_lossy(&domain), name))
    }
}
