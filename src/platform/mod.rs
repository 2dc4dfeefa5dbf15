//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API: owner lookup,
//! the hidden-entry flag and secure log file opening.

pub(crate) mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{is_hidden, open_log_file_secure_append, owner_name};

#[cfg(not(unix))]
pub use windows::{is_hidden, open_log_file_secure_append, owner_name};
