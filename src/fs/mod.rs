//! File System Module
//!
//! Path resolution against the session's current directory and the
//! streaming operations built on top of it:
//! - PathResolver: owns the current directory, validates path expressions
//! - operations: list, read, create, rename, remove, copy, move, hash,
//!   compress, decompress
//! - streams: chunked pipelines, text chunk reader, digest

pub mod types;
pub mod resolver;
pub mod streams;
pub mod operations;

pub use types::*;
pub use resolver::{PathResolver, SessionState};
pub use streams::{Pipeline, StreamEnd, TextChunks, Transform, CHUNK_SIZE, TRANSFORM_SLICE};
pub use operations::COMPRESSED_EXTENSION;
