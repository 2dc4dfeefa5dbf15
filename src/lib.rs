//! fs_inspect: filesystem inspection toolkit.
//!
//! - [`FileEntity`] / [`FolderEntity`]: attribute snapshots bound to a path,
//!   plus rename, delete, lock probing and folder listing.
//! - [`walk`]: depth-first visitation with post-order directories, a hidden
//!   entry policy and per-entry failure tracking.
//! - [`search`]: name matching over a walk.
//! - [`copy_into`]: bulk copy with replace and delete-source policies.
//!
//! Long operations check [`shutdown::is_requested`] between entries.

pub mod config;
pub mod entity;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod search;
pub mod shutdown;
pub mod walk;

pub use config::{
    CONFIG_ENV, Config, LogLevel, default_config_path, default_log_path, load_config,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use entity::{
    FileAttributes, FileEntity, FolderAttributes, FolderEntity, ListKind, Probe, SystemProbe,
    Times, Timestamp, sniff_mime,
};
pub use errors::{EntryKind, Failure, FsError};
pub use fs_ops::{CopyOptions, CopyReport, copy_into, io_error_with_help, io_error_with_help_io};
pub use search::{SearchQuery, SearchQueryBuilder, contains_match, search};
pub use walk::{Visit, VisitKind, VisitResult, visit, walk};
