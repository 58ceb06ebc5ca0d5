// src/commands/hash/mod.rs
// hash — SHA-256 checksum of a file
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct HashCommand;

#[async_trait]
impl Command for HashCommand {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn usage(&self) -> &'static str {
        "hash FILE - print the SHA-256 digest of FILE in hex"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let file = ctx.arg(0, "hash", "file")?.to_string();
        let digest = operations::hash(ctx.resolver, &file).await?;
        ctx.writeln(&digest).await
    }
}
