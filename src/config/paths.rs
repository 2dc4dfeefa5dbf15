//! OS-appropriate config and log locations, and the symlinked-ancestor check
//! used before writing log files.

use dirs::{config_dir, data_dir};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "fs_inspect";

/// `<config_dir>/fs_inspect/config.xml`, falling back to `$HOME/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir()
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .map(|base| base.join(APP_DIR).join("config.xml"))
}

/// `<data_dir>/fs_inspect/fs_inspect.log`, falling back to `$HOME/.local/share`.
pub fn default_log_path() -> Option<PathBuf> {
    data_dir()
        .or_else(|| {
            std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
        })
        .map(|base| base.join(APP_DIR).join("fs_inspect.log"))
}

/// True if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    for anc in path.ancestors().skip(1) {
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}
