//! Runtime settings and the verbosity enum.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::CopyOptions;

/// User-facing verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// Per-operation detail
    Info,
    /// Per-entry detail
    Debug,
}

impl LogLevel {
    /// Case-insensitive, with a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Defaults for the binary; every field can be overridden by a CLI flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    /// Include hidden entries in walks, searches and listings.
    pub show_hidden: bool,
    pub case_sensitive: bool,
    pub exact_match: bool,
    /// Overwrite existing copy destinations.
    pub replace: bool,
    /// Remove copy sources once copied.
    pub delete_source: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            log_file: None,
            show_hidden: false,
            case_sensitive: true,
            exact_match: false,
            replace: true,
            delete_source: false,
        }
    }
}

impl Config {
    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            replace: self.replace,
            delete_source: self.delete_source,
        }
    }
}
