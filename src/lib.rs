//! file-manager - an interactive, shell-like file manager
//!
//! This library keeps a virtual current directory, resolves relative and
//! absolute path expressions against it segment by segment, and runs
//! streaming file operations (copy, move, hash, compress, ...) on the
//! validated paths.

pub mod commands;
pub mod fs;
pub mod session;

pub use session::{FileManager, FileManagerOptions, Flow};
