// src/commands/registry.rs
use std::collections::HashMap;
use super::types::Command;

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    fn usages(&self) -> Vec<(&'static str, &'static str)> {
        self.commands.values().map(|c| (c.name(), c.usage())).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use super::add::AddCommand;
use super::cat::CatCommand;
use super::cd::{CdCommand, UpCommand};
use super::compress::{CompressCommand, DecompressCommand};
use super::cp::CpCommand;
use super::hash::HashCommand;
use super::help_cmd::HelpCommand;
use super::ls::LsCommand;
use super::mv::MvCommand;
use super::rm::RmCommand;
use super::rn::RnCommand;

/// 注册文件管理器的全部命令
pub fn register_file_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(UpCommand));
    registry.register(Box::new(CatCommand));
    registry.register(Box::new(AddCommand));
    registry.register(Box::new(RnCommand));
    registry.register(Box::new(RmCommand));
    registry.register(Box::new(CpCommand));
    registry.register(Box::new(MvCommand));
    registry.register(Box::new(HashCommand));
    registry.register(Box::new(CompressCommand));
    registry.register(Box::new(DecompressCommand));

    let help = HelpCommand::new(registry.usages());
    registry.register(Box::new(help));
}

/// 创建包含全部命令的注册表
pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_file_commands(&mut registry);
    registry
}
