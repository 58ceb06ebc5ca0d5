//! File Manager Session
//!
//! Main entry point for a file manager session.
//! Ties together the path resolver and the command registry: one input line
//! in, one command dispatched, errors reported and never fatal.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use tokio::io::AsyncWriteExt;

use crate::commands::{create_default_registry, CommandContext, CommandRegistry, Output};
use crate::fs::{FsError, PathResolver};

/// Options for creating a file manager session.
#[derive(Debug, Clone, Default)]
pub struct FileManagerOptions {
    /// Starting directory (defaults to the user's home directory)
    pub cwd: Option<PathBuf>,
}

/// What the caller's input loop should do after a line was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A file manager session: one current directory, one command at a time.
pub struct FileManager {
    resolver: PathResolver,
    registry: CommandRegistry,
}

impl FileManager {
    /// Create a session starting in `options.cwd`, or the home directory.
    pub async fn new(options: FileManagerOptions) -> Result<Self, FsError> {
        let start = options
            .cwd
            .or_else(dirs::home_dir)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR));
        let resolver = PathResolver::open(&start).await?;
        tracing::info!(cwd = %resolver.current_dir().display(), "session started");
        Ok(Self::with_resolver(resolver))
    }

    pub fn with_resolver(resolver: PathResolver) -> Self {
        Self {
            resolver,
            registry: create_default_registry(),
        }
    }

    /// Get current working directory.
    pub fn cwd(&self) -> &Path {
        self.resolver.current_dir()
    }

    pub fn prompt(&self) -> String {
        format!("{} > ", self.cwd().display())
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Execute one input line.
    ///
    /// Results go to `stdout`; unknown commands and failed operations are
    /// reported on `stderr` and leave the session running.
    pub async fn exec(&mut self, line: &str, stdout: Output<'_>, stderr: Output<'_>) -> Flow {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Flow::Continue;
        };
        if name == ".exit" || name == "exit" {
            return Flow::Exit;
        }
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let Some(command) = self.registry.get(name) else {
            tracing::debug!(command = name, "unknown command");
            report(stderr, &format!("\"{}\" command not found", name)).await;
            return Flow::Continue;
        };

        let ctx = CommandContext {
            args,
            resolver: &mut self.resolver,
            stdout,
        };
        if let Err(err) = command.execute(ctx).await {
            tracing::warn!(command = name, error = %err, "command failed");
            report(stderr, &format!("Operation failed: {}", err)).await;
        }
        Flow::Continue
    }
}

async fn report(stderr: Output<'_>, message: &str) {
    let line = format!("{}\n", message);
    if let Err(e) = stderr.write_all(line.as_bytes()).await {
        tracing::error!(error = %e, message, "could not write to stderr");
    }
}
