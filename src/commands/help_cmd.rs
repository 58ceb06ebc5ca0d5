use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandError};

/// Lists the registered commands; built by the registry from their usages.
pub struct HelpCommand {
    entries: Vec<(&'static str, &'static str)>,
}

impl HelpCommand {
    pub fn new(mut entries: Vec<(&'static str, &'static str)>) -> Self {
        entries.sort_by_key(|(name, _)| *name);
        Self { entries }
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str { "help" }

    fn usage(&self) -> &'static str {
        "help [COMMAND] - list commands, or show how to use COMMAND"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.wants_help() {
            return ctx.writeln(self.usage()).await;
        }

        if let Some(wanted) = ctx.args.first().cloned() {
            let usage = self
                .entries
                .iter()
                .chain(std::iter::once(&(self.name(), self.usage())))
                .find(|(name, _)| *name == wanted)
                .map(|(_, usage)| *usage);
            return match usage {
                Some(usage) => ctx.writeln(usage).await,
                None => ctx.writeln(&format!("\"{}\" command not found", wanted)).await,
            };
        }

        let mut stdout = String::from("Available commands:\n\n");
        for (_, usage) in &self.entries {
            stdout.push_str(&format!("  {}\n", usage));
        }
        stdout.push_str(&format!("  {}\n", self.usage()));
        stdout.push_str("  .exit - leave the file manager\n");
        ctx.write(&stdout).await
    }
}
