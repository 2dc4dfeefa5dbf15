//! Config lookup order: explicit path, then $FS_INSPECT_CONFIG.

use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use fs_inspect::{CONFIG_ENV, load_config};

#[test]
#[serial]
fn env_variable_selects_config_file() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom.xml");
    fs::write(&cfg, "<config><exact_match>true</exact_match></config>").unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &cfg) };
    let loaded = load_config(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };

    let (config, source) = loaded.unwrap();
    assert!(config.exact_match);
    assert_eq!(source.as_deref(), Some(cfg.as_path()));
}

#[test]
#[serial]
fn explicit_path_beats_env_variable() {
    let td = tempdir().unwrap();
    let from_env = td.path().join("env.xml");
    let explicit = td.path().join("flag.xml");
    fs::write(&from_env, "<config><replace>false</replace></config>").unwrap();
    fs::write(&explicit, "<config><delete_source>true</delete_source></config>").unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &from_env) };
    let loaded = load_config(Some(&explicit));
    unsafe { std::env::remove_var(CONFIG_ENV) };

    let (config, source) = loaded.unwrap();
    assert!(config.delete_source);
    assert!(config.replace);
    assert_eq!(source.as_deref(), Some(explicit.as_path()));
}

#[test]
#[serial]
fn named_but_missing_config_is_an_error() {
    let td = tempdir().unwrap();
    unsafe { std::env::set_var(CONFIG_ENV, td.path().join("absent.xml")) };
    let loaded = load_config(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };
    assert!(loaded.is_err());
}
