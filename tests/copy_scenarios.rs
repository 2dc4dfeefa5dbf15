//! Bulk copy outcomes: succeeded, failed and skipped partitions.

use assert_fs::prelude::*;
use filetime::FileTime;
use std::fs;

use fs_inspect::{CopyOptions, FsError, copy_into};

#[test]
fn existing_and_missing_sources_are_partitioned() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("a.txt").write_binary(&[7u8; 10]).unwrap();
    let a = t.child("a.txt").path().to_path_buf();
    let missing = t.child("missing.txt").path().to_path_buf();
    let out = t.child("out");

    let opts = CopyOptions {
        replace: true,
        delete_source: false,
    };
    let report = copy_into(&[a.clone(), missing.clone()], out.path(), &opts);

    assert_eq!(report.succeeded, vec![a.clone()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, missing);
    assert!(matches!(report.failed[0].error, FsError::NotFound(_)));
    assert_eq!(fs::metadata(out.child("a.txt").path()).unwrap().len(), 10);
    assert!(a.exists());
}

#[test]
fn skipped_source_is_neither_succeeded_nor_failed() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("in/report.csv").write_str("fresh").unwrap();
    t.child("out/report.csv").write_str("stale").unwrap();
    let src = t.child("in/report.csv").path().to_path_buf();

    let opts = CopyOptions {
        replace: false,
        delete_source: false,
    };
    let report = copy_into(&[&src], t.child("out").path(), &opts);

    assert!(report.succeeded.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.skipped, vec![src]);
    t.child("out/report.csv").assert("stale");
}

#[test]
fn delete_source_removes_copied_file_and_tree() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("a.txt").write_str("alpha").unwrap();
    t.child("dir/nested/b.txt").write_str("beta").unwrap();
    let a = t.child("a.txt").path().to_path_buf();
    let dir = t.child("dir").path().to_path_buf();

    let opts = CopyOptions {
        replace: true,
        delete_source: true,
    };
    let report = copy_into(&[&a, &dir], t.child("out").path(), &opts);

    assert_eq!(report.succeeded, vec![a.clone(), dir.clone()]);
    assert!(!a.exists());
    assert!(!dir.exists());
    t.child("out/a.txt").assert("alpha");
    t.child("out/dir/nested/b.txt").assert("beta");
}

#[test]
fn one_failure_does_not_stop_later_sources() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("first.txt").write_str("1").unwrap();
    t.child("last.txt").write_str("3").unwrap();
    let first = t.child("first.txt").path().to_path_buf();
    let gone = t.child("gone.txt").path().to_path_buf();
    let last = t.child("last.txt").path().to_path_buf();

    let report = copy_into(&[&first, &gone, &last], t.child("out").path(), &CopyOptions::default());
    assert_eq!(report.succeeded, vec![first, last]);
    assert_eq!(report.failed_paths().collect::<Vec<_>>(), vec![gone.as_path()]);
}

#[test]
fn copied_files_keep_their_modification_time() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("old.log").write_str("x").unwrap();
    let src = t.child("old.log").path().to_path_buf();
    let stamp = FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&src, stamp).unwrap();

    let report = copy_into(&[&src], t.child("out").path(), &CopyOptions::default());
    assert_eq!(report.succeeded.len(), 1);
    let copied = fs::metadata(t.child("out/old.log").path()).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&copied), stamp);
}

#[test]
fn destination_directory_is_created_on_demand() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("a.txt").write_str("a").unwrap();
    let deep = t.child("x/y/z");

    let report = copy_into(&[t.child("a.txt").path()], deep.path(), &CopyOptions::default());
    assert_eq!(report.succeeded.len(), 1);
    deep.child("a.txt").assert("a");
}
