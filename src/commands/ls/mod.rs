// src/commands/ls/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};
use crate::fs::{operations, Listing};

pub struct LsCommand;

/// One line per entry, names padded to the longest name in the listing.
fn format_listing(listing: &Listing) -> String {
    let width = listing.name_width();
    let mut out = String::new();
    for entry in listing.entries() {
        out.push_str(&format!("{:<width$} {}\n", entry.name, entry.kind, width = width));
    }
    out
}

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn usage(&self) -> &'static str {
        "ls [DIR] - list DIR (default: current directory), directories first"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        let target = ctx.args.first().cloned();
        let listing = operations::list(ctx.resolver, target.as_deref()).await?;
        let text = format_listing(&listing);
        ctx.write(&text).await
    }
}
