// src/commands/compress/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct CompressCommand;
pub struct DecompressCommand;

#[async_trait]
impl Command for CompressCommand {
    fn name(&self) -> &'static str { "compress" }

    fn usage(&self) -> &'static str {
        "compress FILE DIR - write a gzip copy of FILE to DIR/FILE.gz"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let src = ctx.arg(0, "compress", "source")?.to_string();
        let dest = ctx.arg(1, "compress", "destination")?.to_string();
        operations::compress(ctx.resolver, &src, &dest).await?;
        Ok(())
    }
}

#[async_trait]
impl Command for DecompressCommand {
    fn name(&self) -> &'static str { "decompress" }

    fn usage(&self) -> &'static str {
        "decompress FILE.gz DIR - inflate FILE.gz into DIR/FILE"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let src = ctx.arg(0, "decompress", "source")?.to_string();
        let dest = ctx.arg(1, "decompress", "destination")?.to_string();
        operations::decompress(ctx.resolver, &src, &dest).await?;
        Ok(())
    }
}
