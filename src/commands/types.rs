// src/commands/types.rs
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use crate::fs::{FsError, PathResolver};

/// Output sink a command writes its results to.
pub type Output<'a> = &'a mut (dyn AsyncWrite + Unpin + Send);

/// 命令执行错误
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{command}: missing {operand} operand")]
    MissingOperand {
        command: &'static str,
        operand: &'static str,
    },

    #[error(transparent)]
    Fs(#[from] FsError),
}

impl CommandError {
    pub fn missing(command: &'static str, operand: &'static str) -> Self {
        CommandError::MissingOperand { command, operand }
    }
}

/// 命令执行上下文
pub struct CommandContext<'a> {
    pub args: Vec<String>,
    pub resolver: &'a mut PathResolver,
    pub stdout: Output<'a>,
}

impl<'a> CommandContext<'a> {
    /// Positional argument `index`, or a missing-operand error.
    pub fn arg(&self, index: usize, command: &'static str, operand: &'static str) -> Result<&str, CommandError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CommandError::missing(command, operand))
    }

    pub fn wants_help(&self) -> bool {
        self.args.first().is_some_and(|a| a == "--help")
    }

    pub async fn write(&mut self, text: &str) -> Result<(), CommandError> {
        self.stdout
            .write_all(text.as_bytes())
            .await
            .map_err(|e| FsError::io("write", "<stdout>", e))?;
        Ok(())
    }

    pub async fn writeln(&mut self, text: &str) -> Result<(), CommandError> {
        self.write(text).await?;
        self.write("\n").await
    }
}

/// 命令 trait
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn usage(&self) -> &'static str;
    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError>;
}
