// src/commands/rn/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct RnCommand;

#[async_trait]
impl Command for RnCommand {
    fn name(&self) -> &'static str {
        "rn"
    }

    fn usage(&self) -> &'static str {
        "rn PATH NEW_NAME - rename PATH to NEW_NAME in the same directory"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let old = ctx.arg(0, "rn", "source")?.to_string();
        let new = ctx.arg(1, "rn", "new name")?.to_string();
        operations::rename(ctx.resolver, &old, &new).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{fixture, run};

    #[tokio::test]
    async fn test_rn_renames_in_place() {
        let (tmp, mut resolver) = fixture().await;
        let (result, _) = run(&RnCommand, &mut resolver, &["notes.txt", "notes.md"]).await;
        result.unwrap();
        assert!(!tmp.path().join("notes.txt").exists());
        assert!(tmp.path().join("notes.md").exists());
    }

    #[tokio::test]
    async fn test_rn_needs_two_operands() {
        let (tmp, mut resolver) = fixture().await;
        let (result, _) = run(&RnCommand, &mut resolver, &["notes.txt"]).await;
        assert!(matches!(result, Err(CommandError::MissingOperand { command: "rn", operand: "new name" })));
        assert!(tmp.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_rn_help_only_as_first_argument() {
        let (tmp, mut resolver) = fixture().await;
        let (result, out) = run(&RnCommand, &mut resolver, &["notes.txt", "--help"]).await;
        result.unwrap();
        assert!(out.is_empty());
        assert!(tmp.path().join("--help").exists());

        let (result, out) = run(&RnCommand, &mut resolver, &["--help"]).await;
        result.unwrap();
        assert!(out.contains("rn"));
    }
}
