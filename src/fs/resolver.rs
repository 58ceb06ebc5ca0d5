//! Path Resolver
//!
//! Owns the session's virtual current directory and turns user path
//! expressions into validated absolute paths.
//!
//! Directory expressions are walked one segment at a time against the real
//! filesystem, so a typo deep inside a path is reported at the exact segment
//! that does not exist (or that is a file). File expressions resolve their
//! directory prefix the same way but leave the leaf unchecked: whether the
//! leaf must exist, must not exist, or must be a plain file is decided by the
//! operation that asked.

use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use super::types::FsError;

/// The single mutable value of a session: where relative paths start from.
///
/// Always an existing directory; only [`PathResolver::change_directory`]
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_dir: PathBuf,
}

impl SessionState {
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }
}

/// Resolves path expressions relative to the session's current directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    state: SessionState,
}

impl PathResolver {
    /// Create a resolver starting at `current_dir` without validating it.
    ///
    /// Use [`PathResolver::open`] for directories that come from user input.
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: SessionState { current_dir: current_dir.into() },
        }
    }

    /// Create a resolver starting at the canonical form of `start`, which
    /// must be an existing directory.
    pub async fn open(start: impl AsRef<Path>) -> Result<Self, FsError> {
        let start = start.as_ref();
        let canonical = tokio::fs::canonicalize(start)
            .await
            .map_err(|e| missing_or_io(e, "open", start))?;
        let meta = tokio::fs::metadata(&canonical)
            .await
            .map_err(|e| FsError::io("open", &canonical, e))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory {
                segment: leaf_display(&canonical),
                path: canonical,
            });
        }
        Ok(Self::new(canonical))
    }

    pub fn current_dir(&self) -> &Path {
        self.state.current_dir()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Resolve `expression` to an existing directory.
    ///
    /// `..` never climbs above the filesystem root, `.` and empty segments
    /// are skipped, and resolution stops at the first segment that is
    /// missing or not a directory. The session state is not touched.
    pub async fn resolve_directory(&self, expression: &str) -> Result<PathBuf, FsError> {
        let mut working = if expression.starts_with(MAIN_SEPARATOR) {
            filesystem_root(self.current_dir())
        } else {
            self.current_dir().to_path_buf()
        };

        let mut segments: Vec<&str> = expression.split(MAIN_SEPARATOR).collect();
        while segments.last() == Some(&"") {
            segments.pop();
        }

        for segment in segments {
            match segment {
                "" | "." => continue,
                ".." => {
                    working.pop();
                }
                name => {
                    let candidate = working.join(name);
                    match tokio::fs::metadata(&candidate).await {
                        Ok(meta) if meta.is_dir() => working = candidate,
                        Ok(_) => {
                            return Err(FsError::NotADirectory {
                                path: candidate,
                                segment: name.to_string(),
                            });
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {
                            return Err(FsError::NoSuchPath {
                                path: candidate,
                                segment: name.to_string(),
                            });
                        }
                        Err(e) => return Err(FsError::io("resolve", candidate, e)),
                    }
                }
            }
            tracing::debug!(segment, resolved = %working.display(), "resolved segment");
        }

        Ok(working)
    }

    /// Resolve `expression` and make it the current directory.
    ///
    /// On failure the current directory is left as it was.
    pub async fn change_directory(&mut self, expression: &str) -> Result<&Path, FsError> {
        let resolved = self.resolve_directory(expression).await?;
        tracing::info!(
            from = %self.state.current_dir.display(),
            to = %resolved.display(),
            "changed directory"
        );
        self.state.current_dir = resolved;
        Ok(self.current_dir())
    }

    /// Resolve the directory part of `expression` and join its leaf onto it.
    ///
    /// The leaf itself is not checked; callers decide whether it has to
    /// exist. A leaf of `.`, `..` or nothing at all is rejected because it
    /// does not name an entry.
    pub async fn resolve_file(&self, expression: &str) -> Result<PathBuf, FsError> {
        let trimmed = expression.trim_end_matches(MAIN_SEPARATOR);
        let (prefix, leaf) = match trimmed.rsplit_once(MAIN_SEPARATOR) {
            Some(("", leaf)) => (MAIN_SEPARATOR_STR, leaf),
            Some((prefix, leaf)) => (prefix, leaf),
            None => ("", trimmed),
        };

        if leaf.is_empty() || leaf == "." || leaf == ".." {
            return Err(FsError::InvalidName { name: expression.to_string() });
        }

        let directory = self.resolve_directory(prefix).await?;
        Ok(directory.join(leaf))
    }
}

/// Final path component as a string, for error reporting.
pub(crate) fn leaf_display(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Map `NotFound` to [`FsError::NoSuchPath`] for the leaf of `path`.
pub(crate) fn missing_or_io(err: io::Error, operation: &'static str, path: &Path) -> FsError {
    if err.kind() == io::ErrorKind::NotFound {
        FsError::NoSuchPath {
            segment: leaf_display(path),
            path: path.to_path_buf(),
        }
    } else {
        FsError::io(operation, path, err)
    }
}

fn filesystem_root(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR))
}

// ============================================================================
// Tests
// ============================================================================
