//! Unique sibling names for throwaway files (copy temps, rename probes).
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden name inside `dir`: `.fs_inspect.<tag>.<pid>.<nanos>.<seq>`.
pub(crate) fn tmp_name_in(dir: &Path, tag: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".fs_inspect.{tag}.{pid}.{nanos}.{seq}"))
}

/// Same as [`tmp_name_in`], placed next to `target`.
pub(crate) fn tmp_sibling_name(target: &Path, tag: &str) -> PathBuf {
    tmp_name_in(target.parent().unwrap_or_else(|| Path::new(".")), tag)
}
