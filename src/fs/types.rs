//! File System Types
//!
//! Error taxonomy and value types shared by the resolver and the stream
//! operations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("\"{}\" no such file or directory (at segment '{segment}')", path.display())]
    NoSuchPath { path: PathBuf, segment: String },

    #[error("\"{}\" is a file, not a directory (at segment '{segment}')", path.display())]
    NotADirectory { path: PathBuf, segment: String },

    #[error("\"{}\" is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("\"{name}\" does not have the .{extension} extension")]
    InvalidExtension { name: String, extension: String },

    #[error("\"{name}\" is not a valid file name in the current directory")]
    InvalidName { name: String },

    #[error("\"{}\" already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("\"{}\" is the current directory or one of its parents", path.display())]
    InUse { path: PathBuf },

    #[error("{operation} failed for \"{}\": {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error with the operation and the path it happened on.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FsError::Io { operation, path: path.into(), source }
    }

    /// The path fragment this error is about.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::NoSuchPath { path, .. }
            | FsError::NotADirectory { path, .. }
            | FsError::NotAFile { path }
            | FsError::AlreadyExists { path }
            | FsError::InUse { path }
            | FsError::Io { path, .. } => Some(path),
            FsError::InvalidExtension { .. } | FsError::InvalidName { .. } => None,
        }
    }
}

/// Kind of a directory entry as reported by the enumeration itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => f.write_str("dir/"),
            EntryKind::File => f.write_str("file"),
        }
    }
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Result of listing a directory: sub-directories first, then everything else.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub directories: Vec<ListEntry>,
    pub files: Vec<ListEntry>,
}

impl Listing {
    /// All entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &ListEntry> {
        self.directories.iter().chain(self.files.iter())
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the longest name, used to align the kind column.
    pub fn name_width(&self) -> usize {
        self.entries().map(|e| e.name.chars().count()).max().unwrap_or(0)
    }
}

/// Check that a bare name can be created in a single directory.
pub fn validate_leaf_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(FsError::InvalidName { name: name.to_string() });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
