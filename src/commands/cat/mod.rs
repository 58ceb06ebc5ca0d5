// src/commands/cat/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::operations;

pub struct CatCommand;

#[async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn usage(&self) -> &'static str {
        "cat FILE - print the contents of FILE"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let file = ctx.arg(0, "cat", "file")?.to_string();
        let mut chunks = operations::read_file(ctx.resolver, &file).await?;

        // 逐块输出，不把整个文件读进内存
        let mut ends_with_newline = true;
        while let Some(chunk) = chunks.next_chunk().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }
            ends_with_newline = chunk.ends_with('\n');
            ctx.write(&chunk).await?;
        }
        if !ends_with_newline {
            ctx.write("\n").await?;
        }
        Ok(())
    }
}
