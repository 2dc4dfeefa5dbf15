//! Command-line definition.
//!
//! Global flags override the XML config; subcommands map one-to-one onto
//! library operations.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::str::FromStr;

use fs_inspect::{Config, LogLevel};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Inspect, walk, search and copy files and folders")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to use instead of $FS_INSPECT_CONFIG or the default location.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Shorthand for `--log-level debug`.
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// One of: quiet, normal, info, debug.
    #[arg(long, global = true, value_parser = LogLevel::from_str)]
    pub log_level: Option<LogLevel>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as structured JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the attributes of a file or folder.
    Info {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// List every entry under ROOT, directories after their contents.
    Walk {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        #[arg(long)]
        show_hidden: bool,
    },
    /// Find entries under ROOT whose name matches KEY.
    Search {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        key: String,
        /// Match the whole name instead of a substring.
        #[arg(long)]
        exact: bool,
        #[arg(short = 'i', long)]
        ignore_case: bool,
        #[arg(long)]
        show_hidden: bool,
        /// Only report whether anything matches.
        #[arg(long)]
        first: bool,
    },
    /// Copy SOURCES into a destination directory.
    Copy {
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        sources: Vec<PathBuf>,
        #[arg(long, value_hint = ValueHint::DirPath)]
        dest: PathBuf,
        /// Skip sources whose destination already exists.
        #[arg(long)]
        no_replace: bool,
        /// Remove each source after it was copied.
        #[arg(long)]
        delete_source: bool,
    },
    /// Rename a file or folder in place.
    Rename {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        new_name: String,
    },
    /// Delete a file, or a folder with everything in it.
    Delete {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Report whether a file is locked by another process.
    Locked {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// List the direct children of a folder.
    List {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        #[arg(long, conflicts_with = "folders")]
        files: bool,
        #[arg(long)]
        folders: bool,
        #[arg(long)]
        show_hidden: bool,
    },
    /// Remove everything inside a folder but keep the folder.
    Erase {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },
}

impl Args {
    /// Precedence: --debug > --log-level > config.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply global and per-command flags on top of the loaded config.
    /// Flags can only switch behaviour on; unset flags leave the config value.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        match &self.command {
            Command::Walk { show_hidden, .. } | Command::List { show_hidden, .. } => {
                cfg.show_hidden |= *show_hidden;
            }
            Command::Search {
                exact,
                ignore_case,
                show_hidden,
                ..
            } => {
                cfg.exact_match |= *exact;
                cfg.case_sensitive &= !*ignore_case;
                cfg.show_hidden |= *show_hidden;
            }
            Command::Copy {
                no_replace,
                delete_source,
                ..
            } => {
                cfg.replace &= !*no_replace;
                cfg.delete_source |= *delete_source;
            }
            _ => {}
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
