//! Stream Operations
//!
//! Every operation resolves its path arguments through the [`PathResolver`]
//! first and returns the resolver's failure before touching the
//! filesystem. Only then are streams opened.

use std::io;
use std::path::{Path, PathBuf};

use super::resolver::{leaf_display, missing_or_io, PathResolver};
use super::streams::{digest, GzipDecode, GzipEncode, Passthrough, Pipeline, StreamEnd, TextChunks, Transform};
use super::types::{validate_leaf_name, EntryKind, FsError, ListEntry, Listing};

/// Extension added by [`compress`] and required by [`decompress`].
pub const COMPRESSED_EXTENSION: &str = "gz";

/// List the immediate entries of a directory, sub-directories first.
///
/// Entry kinds come from the directory enumeration and do not follow
/// symlinks.
pub async fn list(resolver: &PathResolver, expression: Option<&str>) -> Result<Listing, FsError> {
    let directory = resolver.resolve_directory(expression.unwrap_or("")).await?;
    let mut entries = tokio::fs::read_dir(&directory)
        .await
        .map_err(|e| FsError::io("list", &directory, e))?;

    let mut listing = Listing::default();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::io("list", &directory, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| FsError::io("list", entry.path(), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if file_type.is_dir() {
            listing.directories.push(ListEntry { name, kind: EntryKind::Directory });
        } else {
            listing.files.push(ListEntry { name, kind: EntryKind::File });
        }
    }
    Ok(listing)
}

/// Open a file for lazy, chunked reading as text.
pub async fn read_file(resolver: &PathResolver, expression: &str) -> Result<TextChunks, FsError> {
    let path = resolve_existing_file(resolver, expression).await?;
    TextChunks::open(path).await
}

/// Create an empty file in the current directory.
///
/// An existing file with the same name is truncated.
pub async fn create_file(resolver: &PathResolver, name: &str) -> Result<PathBuf, FsError> {
    validate_leaf_name(name)?;
    let path = resolver.current_dir().join(name);
    tokio::fs::File::create(&path)
        .await
        .map_err(|e| FsError::io("create", &path, e))?;
    tracing::info!(path = %path.display(), "created file");
    Ok(path)
}

/// Rename an entry in place, keeping it in the same directory.
pub async fn rename(resolver: &PathResolver, expression: &str, new_name: &str) -> Result<PathBuf, FsError> {
    validate_leaf_name(new_name)?;
    let old = resolver.resolve_file(expression).await?;
    let meta = tokio::fs::symlink_metadata(&old)
        .await
        .map_err(|e| missing_or_io(e, "rename", &old))?;
    ensure_not_in_use(resolver, &old, meta.is_dir()).await?;

    let new = old.with_file_name(new_name);
    if entry_exists(&new).await? {
        return Err(FsError::AlreadyExists { path: new });
    }
    tokio::fs::rename(&old, &new)
        .await
        .map_err(|e| FsError::io("rename", &old, e))?;
    tracing::info!(from = %old.display(), to = %new.display(), "renamed");
    Ok(new)
}

/// Delete a file, or an empty directory.
pub async fn remove(resolver: &PathResolver, expression: &str) -> Result<PathBuf, FsError> {
    let path = resolver.resolve_file(expression).await?;
    let meta = tokio::fs::symlink_metadata(&path)
        .await
        .map_err(|e| missing_or_io(e, "remove", &path))?;

    ensure_not_in_use(resolver, &path, meta.is_dir()).await?;
    if meta.is_dir() {
        tokio::fs::remove_dir(&path)
            .await
            .map_err(|e| FsError::io("remove", &path, e))?;
    } else {
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| FsError::io("remove", &path, e))?;
    }
    tracing::info!(path = %path.display(), "removed");
    Ok(path)
}

/// Copy a file into a directory, keeping its name.
pub async fn copy(resolver: &PathResolver, source: &str, destination: &str) -> Result<PathBuf, FsError> {
    let (from, to_dir) = resolve_transfer(resolver, source, destination).await?;
    let to = to_dir.join(leaf_display(&from));
    run_pipeline("copy", &from, &to, Passthrough).await?;
    Ok(to)
}

/// Copy a file into a directory, then delete the original.
///
/// The two steps are not atomic. If the process stops between them, or the
/// delete fails, the file exists in both places; no attempt is made to undo
/// the copy.
pub async fn move_file(resolver: &PathResolver, source: &str, destination: &str) -> Result<PathBuf, FsError> {
    let (from, to_dir) = resolve_transfer(resolver, source, destination).await?;
    let to = to_dir.join(leaf_display(&from));
    run_pipeline("move", &from, &to, Passthrough).await?;
    tokio::fs::remove_file(&from)
        .await
        .map_err(|e| FsError::io("remove", &from, e))?;
    tracing::info!(from = %from.display(), to = %to.display(), "moved");
    Ok(to)
}

/// SHA-256 of a file's contents, lowercase hex.
pub async fn hash(resolver: &PathResolver, expression: &str) -> Result<String, FsError> {
    let path = resolve_existing_file(resolver, expression).await?;
    digest(&path).await
}

/// gzip a file into `destination/<name>.gz`.
pub async fn compress(resolver: &PathResolver, source: &str, destination: &str) -> Result<PathBuf, FsError> {
    let (from, to_dir) = resolve_transfer(resolver, source, destination).await?;
    let to = to_dir.join(format!("{}.{}", leaf_display(&from), COMPRESSED_EXTENSION));
    run_pipeline("compress", &from, &to, GzipEncode::new()).await?;
    Ok(to)
}

/// Inflate `<name>.gz` into `destination/<name>`.
///
/// The extension is checked on the expression itself, before anything is
/// resolved.
pub async fn decompress(resolver: &PathResolver, source: &str, destination: &str) -> Result<PathBuf, FsError> {
    let stem = strip_compressed_extension(source)?.to_string();
    let (from, to_dir) = resolve_transfer(resolver, source, destination).await?;
    let to = to_dir.join(stem);
    run_pipeline("decompress", &from, &to, GzipDecode::new()).await?;
    Ok(to)
}

/// Leaf of `expression` without the compressed extension.
fn strip_compressed_extension(expression: &str) -> Result<&str, FsError> {
    let trimmed = expression.trim_end_matches(std::path::MAIN_SEPARATOR);
    let leaf = trimmed
        .rsplit_once(std::path::MAIN_SEPARATOR)
        .map_or(trimmed, |(_, leaf)| leaf);
    match leaf.strip_suffix(COMPRESSED_EXTENSION).and_then(|s| s.strip_suffix('.')) {
        Some(stem) if !stem.is_empty() => Ok(stem),
        _ => Err(FsError::InvalidExtension {
            name: leaf.to_string(),
            extension: COMPRESSED_EXTENSION.to_string(),
        }),
    }
}

async fn resolve_existing_file(resolver: &PathResolver, expression: &str) -> Result<PathBuf, FsError> {
    let path = resolver.resolve_file(expression).await?;
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(FsError::NotAFile { path }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FsError::NotAFile { path }),
        Err(e) => Err(FsError::io("stat", &path, e)),
    }
}

/// Resolve a source file and a destination directory.
async fn resolve_transfer(
    resolver: &PathResolver,
    source: &str,
    destination: &str,
) -> Result<(PathBuf, PathBuf), FsError> {
    let from = resolve_existing_file(resolver, source).await?;
    let to_dir = resolver.resolve_directory(destination).await?;
    Ok((from, to_dir))
}

async fn run_pipeline(
    operation: &'static str,
    from: &Path,
    to: &Path,
    transform: impl Transform + 'static,
) -> Result<(), FsError> {
    let source = StreamEnd::open(from).await?;
    let sink = StreamEnd::create_new(to).await?;
    Pipeline::new(operation, source, transform, sink).run().await?;
    tracing::info!(operation, from = %from.display(), to = %to.display(), "stream finished");
    Ok(())
}

/// `InUse` when `path` is the current directory or one of its ancestors,
/// either as spelled or, for a real directory, by canonical location.
async fn ensure_not_in_use(resolver: &PathResolver, path: &Path, is_dir: bool) -> Result<(), FsError> {
    let cwd = resolver.current_dir();
    if cwd.starts_with(path) {
        return Err(FsError::InUse { path: path.to_path_buf() });
    }
    if !is_dir {
        return Ok(());
    }

    let real = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| FsError::io("stat", path, e))?;
    let real_cwd = tokio::fs::canonicalize(cwd)
        .await
        .map_err(|e| FsError::io("stat", cwd, e))?;
    if real_cwd.starts_with(&real) {
        return Err(FsError::InUse { path: path.to_path_buf() });
    }
    Ok(())
}

async fn entry_exists(path: &Path) -> Result<bool, FsError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FsError::io("stat", path, e)),
    }
}

// ============================================================================
// Tests
// ============================================================================
