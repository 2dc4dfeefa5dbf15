//! Application orchestrator: load config, apply flags, start logging, install
//! the Ctrl-C handler and dispatch the subcommand.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use fs_inspect::output as out;
use fs_inspect::{
    Config, EntryKind, FileEntity, FolderEntity, FsError, ListKind, SearchQuery, Timestamp,
    contains_match, copy_into, load_config, search, shutdown, walk,
};

use crate::cli::{Args, Command};
use crate::logging::init_tracing;

/// Run one command. `Ok(false)` means it ran but some entries failed.
pub fn run(args: Args) -> Result<bool> {
    let (mut cfg, cfg_path) = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json)?;
    // Dropped from the signal handler too, so buffered file logs are flushed on Ctrl-C.
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("interrupt received; stopping after the current entry");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    if let Some(p) = &cfg_path {
        debug!(config = %p.display(), "using config file");
    }
    debug!(command = ?args.command, "starting");

    let result = dispatch(&args.command, &cfg);
    if let Err(e) = &result {
        match e.downcast_ref::<FsError>() {
            Some(fe) => error!(code = fe.code(), error = %fe, "command failed"),
            None => error!(error = %e, "command failed"),
        }
    }

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn dispatch(command: &Command, cfg: &Config) -> Result<bool> {
    match command {
        Command::Info { path } => info(path),
        Command::Walk { root, .. } => {
            let res = walk(root, cfg.show_hidden)?;
            for p in &res.visited {
                out::print_user(&p.display().to_string());
            }
            for f in &res.failed {
                out::print_warn(&format!("{}: {}", f.path.display(), f.error));
            }
            Ok(res.failed.is_empty())
        }
        Command::Search { root, key, first, .. } => {
            let query = SearchQuery::builder(root.clone(), key.clone())
                .exact_match(cfg.exact_match)
                .case_sensitive(cfg.case_sensitive)
                .build();
            if *first {
                let found = contains_match(&query, cfg.show_hidden)?;
                out::print_user(if found { "found" } else { "not found" });
                return Ok(found);
            }
            let hits = search(&query, cfg.show_hidden)?;
            for p in &hits {
                out::print_user(&p.display().to_string());
            }
            Ok(!hits.is_empty())
        }
        Command::Copy { sources, dest, .. } => {
            let report = copy_into(sources, dest, &cfg.copy_options());
            for p in &report.succeeded {
                out::print_user(&format!("copied {}", p.display()));
            }
            for p in &report.skipped {
                out::print_info(&format!("skipped {} (destination exists)", p.display()));
            }
            for f in &report.failed {
                out::print_warn(&format!("{}: {}", f.path.display(), f.error));
            }
            Ok(report.failed.is_empty())
        }
        Command::Rename { path, new_name } => {
            if is_dir(path) {
                let mut folder = FolderEntity::bind(path)?;
                folder.rename(new_name)?;
                out::print_success(&format!("renamed to {}", folder.path().display()));
            } else {
                let mut file = FileEntity::bind(path)?;
                file.rename(new_name)?;
                out::print_success(&format!("renamed to {}", file.path().display()));
            }
            Ok(true)
        }
        Command::Delete { path } => {
            if is_dir(path) {
                FolderEntity::bind(path)?.delete()?;
            } else {
                FileEntity::bind(path)?.delete()?;
            }
            out::print_success(&format!("deleted {}", path.display()));
            Ok(true)
        }
        Command::Locked { file } => {
            let locked = FileEntity::bind(file)?.is_locked()?;
            out::print_user(if locked { "locked" } else { "unlocked" });
            Ok(true)
        }
        Command::List {
            dir, files, folders, ..
        } => {
            let kind = match (files, folders) {
                (true, _) => ListKind::Files,
                (_, true) => ListKind::Folders,
                _ => ListKind::All,
            };
            for p in FolderEntity::bind(dir)?.list(kind, cfg.show_hidden)? {
                out::print_user(&p.display().to_string());
            }
            Ok(true)
        }
        Command::Erase { dir } => {
            FolderEntity::bind(dir)?.erase()?;
            out::print_success(&format!("erased contents of {}", dir.display()));
            Ok(true)
        }
    }
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_dir())
}

fn info(path: &Path) -> Result<bool> {
    match FileEntity::bind(path) {
        Ok(file) => {
            let a = file.attributes();
            print_field("kind", "file");
            print_field("path", &file.path().display().to_string());
            print_field("name", &a.name);
            print_field("base name", &a.base_name);
            print_field("extension", &a.extension);
            print_field("parent", &a.parent_path.display().to_string());
            print_field("parent name", &a.parent_name);
            print_field("owner", &a.owner);
            print_field("size", &a.size.to_string());
            print_field("type", &a.mime_type);
            print_times(&a.times.created, &a.times.modified, &a.times.accessed);
        }
        Err(FsError::WrongKind {
            expected: EntryKind::File,
            ..
        }) => {
            let folder = FolderEntity::bind(path)?;
            let a = folder.attributes();
            print_field("kind", "folder");
            print_field("path", &folder.path().display().to_string());
            print_field("name", &a.name);
            print_field("parent", &a.parent_path.display().to_string());
            print_field("parent name", &a.parent_name);
            print_field("owner", &a.owner);
            print_field("size", &a.size.to_string());
            print_times(&a.times.created, &a.times.modified, &a.times.accessed);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(true)
}

fn print_field(label: &str, value: &str) {
    out::print_user(&format!("{label:<12} {value}"));
}

fn print_times(created: &Timestamp, modified: &Timestamp, accessed: &Timestamp) {
    for (label, ts) in [("created", created), ("modified", modified), ("accessed", accessed)] {
        print_field(label, &format!("{} {}", ts.date(), ts.time()));
    }
}
