//! Cooperative cancellation. The shutdown flag is process-wide, so every test
//! here runs serially and clears it on the way out.

use assert_fs::prelude::*;
use serial_test::serial;

use fs_inspect::{CopyOptions, FolderEntity, FsError, copy_into, shutdown, walk};

struct ResetOnDrop;

impl Drop for ResetOnDrop {
    fn drop(&mut self) {
        shutdown::reset();
    }
}

#[test]
#[serial]
fn walk_stops_with_interrupted() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("a/b.txt").touch().unwrap();

    let _reset = ResetOnDrop;
    shutdown::request();
    assert!(matches!(walk(t.path(), false).unwrap_err(), FsError::Interrupted));
}

#[test]
#[serial]
fn copy_reports_every_pending_source_as_interrupted() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("one.txt").touch().unwrap();
    t.child("two.txt").touch().unwrap();
    let sources = [t.child("one.txt").path().to_path_buf(), t.child("two.txt").path().to_path_buf()];

    let _reset = ResetOnDrop;
    shutdown::request();
    let report = copy_into(&sources, t.child("out").path(), &CopyOptions::default());

    assert!(report.succeeded.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(report.failed.iter().all(|f| matches!(f.error, FsError::Interrupted)));
    assert!(!t.child("out").path().exists());
}

#[test]
#[serial]
fn reset_allows_new_work() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("x").touch().unwrap();

    shutdown::request();
    shutdown::reset();
    assert_eq!(walk(t.path(), false).unwrap().visited.len(), 1);
}

#[test]
#[serial]
fn interrupted_folder_rename_keeps_original_binding() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("old/sub/f.txt").write_str("data").unwrap();
    let mut folder = FolderEntity::bind(t.child("old").path()).unwrap();

    let _reset = ResetOnDrop;
    shutdown::request();
    let err = folder.rename("new").unwrap_err();

    assert!(matches!(err, FsError::Interrupted));
    assert_eq!(folder.path(), t.child("old").path());
    assert_eq!(folder.attributes().name, "old");
    assert!(t.child("old/sub/f.txt").path().is_file());
    assert!(!t.child("new").path().exists());
}
