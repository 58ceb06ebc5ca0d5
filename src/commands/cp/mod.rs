// src/commands/cp/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct CpCommand;

#[async_trait]
impl Command for CpCommand {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn usage(&self) -> &'static str {
        "cp FILE DIR - copy FILE into DIR, keeping its name"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let src = ctx.arg(0, "cp", "source")?.to_string();
        let dest = ctx.arg(1, "cp", "destination")?.to_string();
        operations::copy(ctx.resolver, &src, &dest).await?;
        Ok(())
    }
}
