//! Tracing setup for the binary.
//!
//! - Verbosity comes from `LogLevel`; `RUST_LOG` is not consulted.
//! - Console logs go to stderr so command output on stdout stays scriptable.
//! - An optional log file gets a non-blocking layer; it is refused when any
//!   ancestor of the file is a symlink. Missing parent directories are created.
//! - When the requested file cannot be used, the default log location is suggested.

use anyhow::Result;
use chrono::Local;
use std::fmt as stdfmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

use fs_inspect::output as out;
use fs_inspect::platform::open_log_file_secure_append;
use fs_inspect::{LogLevel, default_log_path, io_error_with_help, path_has_symlink_ancestor};

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn to_level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn open_file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            out::print_warn(&format!(
                "not logging to {}: an ancestor directory is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("not logging to {}: {e}", path.display()));
            return None;
        }
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent).map_err(io_error_with_help("create log directory", parent))
    {
        out::print_warn(&format!("not logging to {}: {e:#}", path.display()));
        return None;
    }
    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("failed to open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Suggestion printed when `requested` could not be used for file logging.
fn default_path_hint(requested: &Path, default: Option<&Path>) -> Option<String> {
    default
        .filter(|d| *d != requested)
        .map(|d| format!("the default log file {} can be used instead", d.display()))
}

/// Install the global subscriber. The returned guard flushes the file layer
/// when dropped and must be kept alive until exit.
pub fn init_tracing(lvl: LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::default().add_directive(to_level_filter(lvl).into());
    let (file_writer, guard) = match log_file.map(|p| (p, open_file_writer(p))) {
        Some((_, Some((w, g)))) => (Some(w), Some(g)),
        Some((requested, None)) => {
            if let Some(hint) = default_path_hint(requested, default_log_path().as_deref()) {
                out::print_info(&hint);
            }
            (None, None)
        }
        None => (None, None),
    };

    // Layers differ in type between formats, hence the two arms.
    if json {
        let console = tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_writer(io::stderr);
        let file = file_writer.map(|w| {
            tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_writer(w)
        });
        registry().with(filter).with(console).with(file).try_init()?;
    } else {
        let console = tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(false)
            .compact()
            .with_writer(io::stderr);
        let file = file_writer.map(|w| {
            tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_ansi(false)
                .compact()
                .with_writer(w)
        });
        registry().with(filter).with(console).with(file).try_init()?;
    }
    Ok(guard)
}
