// src/commands/rm/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct RmCommand;

#[async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn usage(&self) -> &'static str {
        "rm PATH - delete a file or an empty directory"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let path = ctx.arg(0, "rm", "path")?.to_string();
        operations::remove(ctx.resolver, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{fixture, run};
    use crate::fs::FsError;

    #[tokio::test]
    async fn test_rm_file() {
        let (tmp, mut resolver) = fixture().await;
        let (result, _) = run(&RmCommand, &mut resolver, &["notes.txt"]).await;
        result.unwrap();
        assert!(!tmp.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_rm_missing() {
        let (_tmp, mut resolver) = fixture().await;
        let (result, _) = run(&RmCommand, &mut resolver, &["ghost.txt"]).await;
        assert!(matches!(result, Err(CommandError::Fs(FsError::NoSuchPath { segment, .. })) if segment == "ghost.txt"));
    }
}
