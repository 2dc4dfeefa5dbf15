//! Filesystem write operations: the bulk copy and the primitives it is built on.

mod atomic;
mod copy;
mod helpers;
mod io_copy;
mod metadata;
mod util;

pub use copy::{CopyOptions, CopyReport, copy_into};
pub use helpers::{io_error_with_help, io_error_with_help_io};
