use assert_fs::prelude::*;

use fs_inspect::{SearchQuery, contains_match, search};

fn sample_tree() -> assert_fs::TempDir {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("readme.txt").touch().unwrap();
    t.child("pkg/Readme.md").touch().unwrap();
    t.child("pkg/lib/readme").touch().unwrap();
    t
}

#[test]
fn exact_case_insensitive_readme_does_not_match_readme_txt() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child("readme.txt").touch().unwrap();
    let q = SearchQuery::builder(t.path(), "README")
        .exact_match(true)
        .case_sensitive(false)
        .build();
    assert!(!contains_match(&q, false).unwrap());
    assert!(search(&q, false).unwrap().is_empty());
}

#[test]
fn exact_case_insensitive_matches_whole_name() {
    let t = sample_tree();
    let q = SearchQuery::builder(t.path(), "README")
        .exact_match(true)
        .case_sensitive(false)
        .build();
    assert_eq!(search(&q, false).unwrap(), vec![t.child("pkg/lib/readme").path().to_path_buf()]);
}

#[test]
fn substring_search_respects_case() {
    let t = sample_tree();
    let sensitive = SearchQuery::builder(t.path(), "readme").build();
    let insensitive = SearchQuery::builder(t.path(), "readme").case_sensitive(false).build();
    assert_eq!(search(&sensitive, false).unwrap().len(), 2);
    assert_eq!(search(&insensitive, false).unwrap().len(), 3);
}

#[test]
fn same_query_gives_same_answer_every_time() {
    let t = sample_tree();
    let q = SearchQuery::builder(t.path(), "ReAdMe").case_sensitive(false).build();
    let before = q.clone();
    let runs: Vec<_> = (0..3).map(|_| search(&q, false).unwrap()).collect();
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(q, before);
}

#[test]
fn hidden_entries_are_only_searched_when_shown() {
    let t = assert_fs::TempDir::new().unwrap();
    t.child(".config/target.toml").touch().unwrap();
    let q = SearchQuery::builder(t.path(), "target").build();
    assert!(!contains_match(&q, false).unwrap());
    assert!(contains_match(&q, true).unwrap());
}
