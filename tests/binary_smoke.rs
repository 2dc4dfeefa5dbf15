//! End-to-end runs of the binary with an isolated config file.

use assert_fs::prelude::*;
use std::process::{Command, Output};

fn run(t: &assert_fs::TempDir, args: &[&str]) -> Output {
    let cfg = t.child("config.xml");
    if !cfg.path().exists() {
        cfg.write_str("<config><log_level>quiet</log_level></config>").unwrap();
    }
    Command::new(assert_cmd::cargo::cargo_bin!("fs_inspect"))
        .env("FS_INSPECT_CONFIG", cfg.path())
        .args(args)
        .output()
        .expect("spawn binary")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout).lines().map(str::to_owned).collect()
}

#[test]
fn walk_prints_visited_paths() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("tree/x").touch().unwrap();
    t.child("tree/.hidden").touch().unwrap();
    let root = t.child("tree");

    let out = run(&t, &["walk", root.path().to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout_lines(&out), vec![root.child("x").path().display().to_string()]);
}

#[test]
fn search_first_exit_code_reflects_match() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("tree/readme.txt").touch().unwrap();
    let root = t.child("tree");
    let root = root.path().to_str().unwrap();

    let hit = run(&t, &["search", root, "README", "-i", "--first"]);
    assert!(hit.status.success());
    assert_eq!(stdout_lines(&hit), vec!["found"]);

    let miss = run(&t, &["search", root, "README", "-i", "--exact", "--first"]);
    assert_eq!(miss.status.code(), Some(2));
    assert_eq!(stdout_lines(&miss), vec!["not found"]);
}

#[test]
fn copy_with_a_missing_source_exits_with_partial_status() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("a.txt").write_str("0123456789").unwrap();
    let a = t.child("a.txt");
    let missing = t.child("missing.txt");
    let out_dir = t.child("out");

    let out = run(
        &t,
        &[
            "copy",
            a.path().to_str().unwrap(),
            missing.path().to_str().unwrap(),
            "--dest",
            out_dir.path().to_str().unwrap(),
        ],
    );
    assert_eq!(out.status.code(), Some(2));
    out_dir.child("a.txt").assert("0123456789");
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.txt"));
}

#[test]
fn info_describes_a_file() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("doc.txt").write_str("hello").unwrap();

    let out = run(&t, &["info", t.child("doc.txt").path().to_str().unwrap()]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("doc.txt"));
    assert!(text.contains("text/plain"));
}

#[test]
fn missing_explicit_config_fails() {
    let t = assert_fs::TempDir::new().unwrap();
    let out = run(
        &t,
        &["--config", t.child("nope.xml").path().to_str().unwrap(), "walk", "."],
    );
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
}
