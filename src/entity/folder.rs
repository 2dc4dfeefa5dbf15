//! Folder entity: a snapshot of one directory, plus listing, walking,
//! erasing and recursive sizing.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::attrs::{self, FolderAttributes, Times};
use super::sniff::{Probe, SystemProbe};
use super::{rename_target, undo_rename, verify_removed};
use crate::errors::{EntryKind, FsError};
use crate::platform;
use crate::walk::{self, Visit, VisitKind, VisitResult};

/// Filter for [`FolderEntity::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    #[default]
    All,
    Files,
    Folders,
}

#[derive(Debug)]
pub struct FolderEntity<P = SystemProbe> {
    path: PathBuf,
    attrs: FolderAttributes,
    probe: P,
}

impl FolderEntity {
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, FsError> {
        Self::bind_with(path, SystemProbe)
    }
}

impl<P: Probe> FolderEntity<P> {
    /// Bind to `path`. Fails with `NotFound`, `WrongKind` (not a directory) or `AttributeRead`.
    pub fn bind_with(path: impl AsRef<Path>, probe: P) -> Result<Self, FsError> {
        let path = attrs::absolute(path.as_ref())?;
        let attrs = read_attributes(&path, &probe)?;
        debug!(path = %path.display(), size = attrs.size, "bound folder");
        Ok(Self { path, attrs, probe })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn attributes(&self) -> &FolderAttributes {
        &self.attrs
    }

    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|m| m.is_dir())
    }

    /// Recursive size of all descendant files, measured now.
    pub fn size(&self) -> Result<u64, FsError> {
        measure_size(&self.path)
    }

    /// True when the folder holds no file bytes at all (empty files and
    /// empty subfolders still count as empty).
    pub fn is_empty(&self) -> Result<bool, FsError> {
        Ok(self.size()? == 0)
    }

    /// Direct children, sorted by path.
    pub fn list(&self, kind: ListKind, show_hidden: bool) -> Result<Vec<PathBuf>, FsError> {
        let rd = fs::read_dir(&self.path)
            .map_err(|e| FsError::from_io("list folder", &self.path, e))?;
        let mut out = Vec::new();
        for entry in rd {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(folder = %self.path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if !show_hidden {
                match platform::is_hidden(&path) {
                    Ok(false) => {}
                    Ok(true) => continue,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "hidden check failed; skipping");
                        continue;
                    }
                }
            }
            let is_dir = path.is_dir();
            let keep = match kind {
                ListKind::All => true,
                ListKind::Files => !is_dir,
                ListKind::Folders => is_dir,
            };
            if keep {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Walk this folder's subtree; see [`crate::walk::walk`].
    pub fn walk(&self, show_hidden: bool) -> Result<VisitResult, FsError> {
        walk::walk(&self.path, show_hidden)
    }

    /// Rename within the same parent and re-snapshot under the new path.
    /// If the re-snapshot fails the folder is moved back and the entity keeps
    /// its original binding.
    pub fn rename(&mut self, new_name: &str) -> Result<(), FsError> {
        let target = rename_target(&self.path, new_name)?;
        fs::rename(&self.path, &target)
            .map_err(|e| FsError::from_io("rename folder", &self.path, e))?;
        let attrs = match read_attributes(&target, &self.probe) {
            Ok(attrs) => attrs,
            Err(err) => return Err(undo_rename(&target, &self.path, err)),
        };
        info!(from = %self.path.display(), to = %target.display(), "renamed folder");
        self.path = target;
        self.attrs = attrs;
        Ok(())
    }

    /// Remove every child, keeping the folder itself. All children are attempted;
    /// the first failure is returned.
    pub fn erase(&self) -> Result<(), FsError> {
        let rd = fs::read_dir(&self.path)
            .map_err(|e| FsError::from_io("list folder", &self.path, e))?;
        let mut first_err = None;
        for entry in rd {
            let result = entry
                .map_err(|e| FsError::from_io("read folder entry", &self.path, e))
                .and_then(|entry| remove_any(&entry.path()));
            if let Err(e) = result {
                warn!(folder = %self.path.display(), error = %e, "erase left an entry behind");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => {
                info!(path = %self.path.display(), "erased folder contents");
                Ok(())
            }
        }
    }

    /// Remove the folder and its whole subtree.
    ///
    /// Not transactional: a failure partway can leave a partially emptied tree.
    pub fn delete(&self) -> Result<(), FsError> {
        fs::remove_dir_all(&self.path)
            .map_err(|e| FsError::from_io("delete folder", &self.path, e))?;
        verify_removed(&self.path)?;
        info!(path = %self.path.display(), "deleted folder");
        Ok(())
    }
}

fn remove_any(path: &Path) -> Result<(), FsError> {
    let meta = fs::symlink_metadata(path).map_err(|e| FsError::from_io("stat", path, e))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| FsError::from_io("remove folder", path, e))
    } else {
        fs::remove_file(path).map_err(|e| FsError::from_io("remove file", path, e))
    }
}

/// Sum descendant file sizes through the visitation engine, so symlinks are
/// never followed and nothing is counted twice. Entries that fail to read are skipped.
pub(crate) fn measure_size(root: &Path) -> Result<u64, FsError> {
    let mut total: u64 = 0;
    walk::visit(root, true, |event| match event {
        Visit::Entry {
            path,
            kind: VisitKind::File,
        } => match fs::symlink_metadata(&path) {
            Ok(meta) => total = total.saturating_add(meta.len()),
            Err(e) => debug!(path = %path.display(), error = %e, "size skipped"),
        },
        Visit::Entry { .. } => {}
        Visit::Failed(f) => debug!(path = %f.path.display(), error = %f.error, "size skipped"),
    })?;
    Ok(total)
}

fn read_attributes<P: Probe>(path: &Path, probe: &P) -> Result<FolderAttributes, FsError> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
        _ => FsError::attribute(path, "metadata", e),
    })?;
    if !meta.is_dir() {
        return Err(FsError::WrongKind {
            path: path.to_path_buf(),
            expected: EntryKind::Directory,
        });
    }

    let owner = probe
        .owner_name(path, &meta)
        .map_err(|e| FsError::attribute(path, "owner", e))?;
    let times = Times::read(path, &meta)?;
    let size = measure_size(path).map_err(|e| match e {
        FsError::Interrupted => e,
        other => FsError::attribute(path, "size", std::io::Error::other(other.to_string())),
    })?;

    // A root folder is its own name and parent.
    let (name, parent_path, parent_name) = if path.parent().is_none() {
        let s = path.to_string_lossy().into_owned();
        (s.clone(), path.to_path_buf(), s)
    } else {
        let (parent_path, parent_name) = attrs::parent_of(path);
        (attrs::file_name_of(path), parent_path, parent_name)
    };

    Ok(FolderAttributes {
        name,
        parent_path,
        parent_name,
        owner,
        size,
        times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn bind_reads_attributes_and_recursive_size() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("proj/a.txt").write_str("12345").unwrap();
        t.child("proj/sub/b.txt").write_str("123").unwrap();
        t.child("proj/.hidden").write_str("12").unwrap();

        let folder = FolderEntity::bind(t.child("proj").path()).unwrap();
        let a = folder.attributes();
        assert_eq!(a.name, "proj");
        assert_eq!(a.parent_path, t.path());
        assert_eq!(a.size, 10, "hidden files count toward size");
        assert!(!a.owner.is_empty());
        assert_eq!(folder.size().unwrap(), 10);
    }

    #[test]
    fn bind_file_is_wrong_kind() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("f.txt").touch().unwrap();
        let err = FolderEntity::bind(t.child("f.txt").path()).unwrap_err();
        assert!(matches!(err, FsError::WrongKind { expected: EntryKind::Directory, .. }));
    }

    #[test]
    fn bind_missing_is_not_found() {
        let t = assert_fs::TempDir::new().unwrap();
        assert!(matches!(
            FolderEntity::bind(t.path().join("nope")).unwrap_err(),
            FsError::NotFound(_)
        ));
    }

    #[test]
    fn list_filters_kind_and_hidden() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("b.txt").touch().unwrap();
        t.child("a/inner.txt").touch().unwrap();
        t.child(".secret").touch().unwrap();
        let folder = FolderEntity::bind(t.path()).unwrap();

        assert_eq!(
            folder.list(ListKind::All, false).unwrap(),
            vec![t.child("a").path().to_path_buf(), t.child("b.txt").path().to_path_buf()]
        );
        assert_eq!(
            folder.list(ListKind::Files, true).unwrap(),
            vec![t.child(".secret").path().to_path_buf(), t.child("b.txt").path().to_path_buf()]
        );
        assert_eq!(
            folder.list(ListKind::Folders, false).unwrap(),
            vec![t.child("a").path().to_path_buf()]
        );
    }

    #[test]
    fn erase_empties_but_keeps_folder() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("box/x.txt").write_str("x").unwrap();
        t.child("box/d/y.txt").write_str("y").unwrap();
        let folder = FolderEntity::bind(t.child("box").path()).unwrap();

        folder.erase().unwrap();
        assert!(folder.exists());
        assert!(folder.list(ListKind::All, true).unwrap().is_empty());
        assert!(folder.is_empty().unwrap());
    }

    #[test]
    fn is_empty_ignores_empty_files() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("z/empty.txt").touch().unwrap();
        let folder = FolderEntity::bind(t.child("z").path()).unwrap();
        assert!(folder.is_empty().unwrap());
    }

    #[test]
    fn rename_and_delete() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("old/f.txt").write_str("abc").unwrap();
        let mut folder = FolderEntity::bind(t.child("old").path()).unwrap();

        folder.rename("new").unwrap();
        assert_eq!(folder.attributes().name, "new");
        assert_eq!(folder.attributes().size, 3);
        assert!(t.child("new/f.txt").path().exists());

        folder.delete().unwrap();
        assert!(!folder.exists());
        assert!(!t.child("new").path().exists());
    }

    #[test]
    fn walk_excludes_the_folder_itself() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("w/one.txt").touch().unwrap();
        let folder = FolderEntity::bind(t.child("w").path()).unwrap();
        let res = folder.walk(false).unwrap();
        assert_eq!(res.visited, vec![t.child("w/one.txt").path().to_path_buf()]);
    }

    #[cfg(unix)]
    #[test]
    fn size_does_not_follow_symlinks() {
        let t = assert_fs::TempDir::new().unwrap();
        t.child("data/big.bin").write_binary(&[0u8; 64]).unwrap();
        t.child("view").create_dir_all().unwrap();
        std::os::unix::fs::symlink(t.child("data").path(), t.child("view/loop").path()).unwrap();
        std::os::unix::fs::symlink(t.path(), t.child("data/cycle").path()).unwrap();

        let folder = FolderEntity::bind(t.path()).unwrap();
        assert_eq!(folder.attributes().size, 64);
    }
}
