// src/commands/cd/mod.rs
//! cd / up - change the session's current directory

use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};

pub struct CdCommand;
pub struct UpCommand;

#[async_trait]
impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn usage(&self) -> &'static str {
        "cd DIR - change the current directory"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let target = ctx.arg(0, "cd", "directory")?.to_string();
        ctx.resolver.change_directory(&target).await?;
        Ok(())
    }
}

#[async_trait]
impl Command for UpCommand {
    fn name(&self) -> &'static str {
        "up"
    }

    fn usage(&self) -> &'static str {
        "up - go to the parent directory (same as cd ..)"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        ctx.resolver.change_directory("..").await?;
        Ok(())
    }
}
