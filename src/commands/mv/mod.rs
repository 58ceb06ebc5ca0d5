// src/commands/mv/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct MvCommand;

#[async_trait]
impl Command for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn usage(&self) -> &'static str {
        "mv FILE DIR - move FILE into DIR (copy, then delete the original)"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let src = ctx.arg(0, "mv", "source")?.to_string();
        let dest = ctx.arg(1, "mv", "destination")?.to_string();
        operations::move_file(ctx.resolver, &src, &dest).await?;
        Ok(())
    }
}
