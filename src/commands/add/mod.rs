// src/commands/add/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct AddCommand;

#[async_trait]
impl Command for AddCommand {
    fn name(&self) -> &'static str {
        "add"
    }

    fn usage(&self) -> &'static str {
        "add NAME - create an empty file NAME in the current directory"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let name = ctx.arg(0, "add", "file name")?.to_string();
        operations::create_file(ctx.resolver, &name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{fixture, run};
    use crate::fs::FsError;

    #[tokio::test]
    async fn test_add_creates_empty_file() {
        let (tmp, mut resolver) = fixture().await;
        let (result, _) = run(&AddCommand, &mut resolver, &["todo.txt"]).await;
        result.unwrap();
        assert_eq!(std::fs::read(tmp.path().join("todo.txt")).unwrap(), b"");
    }

    #[tokio::test]
    async fn test_add_rejects_separator() {
        let (_tmp, mut resolver) = fixture().await;
        let name = format!("docs{}todo.txt", std::path::MAIN_SEPARATOR);
        let (result, _) = run(&AddCommand, &mut resolver, &[&name]).await;
        assert!(matches!(result, Err(CommandError::Fs(FsError::InvalidName { .. }))));
    }
}
