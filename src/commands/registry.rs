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

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use super::alias_cmd::{AliasCommand, UnaliasCommand};
use super::api_cmd::ApiCommand;
use super::bash_cmd::{BashCommand, DotCommand, SourceCommand};
use super::cat::CatCommand;
use super::cd_cmd::CdCommand;
use super::chmod::ChmodCommand;
use super::clear_cmd::{ClearCommand, ExitCommand, ResetCommand};
use super::cp::CpCommand;
use super::curl::CurlCommand;
use super::date::DateCommand;
use super::echo::EchoCommand;
use super::editor_cmd::{NanoCommand, VimCommand};
use super::env::{EnvCommand, ExportCommand, UnsetCommand};
use super::find::FindCommand;
use super::grep::GrepCommand;
use super::gzip::{GunzipCommand, GzipCommand};
use super::help_cmd::HelpCommand;
use super::history_cmd::HistoryCommand;
use super::hostname_cmd::{HostnameCommand, UnameCommand};
use super::jobs_cmd::{BgCommand, FgCommand, JobsCommand, KillCommand, PsCommand};
use super::ln::LnCommand;
use super::ls::LsCommand;
use super::mkdir::MkdirCommand;
use super::mv::MvCommand;
use super::pwd::PwdCommand;
use super::rm::RmCommand;
use super::tar::TarCommand;
use super::touch::TouchCommand;
use super::wget_cmd::WgetCommand;
use super::which_cmd::{TypeCommand, WhichCommand};
use super::whoami_cmd::{GroupsCommand, IdCommand, WhoamiCommand};

/// 注册文件系统命令
pub fn register_filesystem(registry: &mut CommandRegistry) {
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(PwdCommand));
    registry.register(Box::new(CatCommand));
    registry.register(Box::new(EchoCommand));
    registry.register(Box::new(TouchCommand));
    registry.register(Box::new(MkdirCommand));
    registry.register(Box::new(RmCommand));
    registry.register(Box::new(MvCommand));
    registry.register(Box::new(CpCommand));
    registry.register(Box::new(ChmodCommand));
    registry.register(Box::new(LnCommand));
    registry.register(Box::new(FindCommand));
    registry.register(Box::new(GrepCommand));
    registry.register(Box::new(GzipCommand));
    registry.register(Box::new(GunzipCommand));
    registry.register(Box::new(TarCommand));
    registry.register(Box::new(NanoCommand));
    registry.register(Box::new(VimCommand));
}

/// 注册会话命令：作业、环境、别名、脚本
pub fn register_session(registry: &mut CommandRegistry) {
    registry.register(Box::new(JobsCommand));
    registry.register(Box::new(BgCommand));
    registry.register(Box::new(FgCommand));
    registry.register(Box::new(KillCommand));
    registry.register(Box::new(PsCommand));
    registry.register(Box::new(ExportCommand));
    registry.register(Box::new(EnvCommand));
    registry.register(Box::new(UnsetCommand));
    registry.register(Box::new(AliasCommand));
    registry.register(Box::new(UnaliasCommand));
    registry.register(Box::new(SourceCommand));
    registry.register(Box::new(DotCommand));
    registry.register(Box::new(BashCommand));
    registry.register(Box::new(HistoryCommand));
}

/// 注册系统信息与终端命令
pub fn register_system(registry: &mut CommandRegistry) {
    registry.register(Box::new(WhichCommand));
    registry.register(Box::new(TypeCommand));
    registry.register(Box::new(IdCommand));
    registry.register(Box::new(WhoamiCommand));
    registry.register(Box::new(GroupsCommand));
    registry.register(Box::new(HostnameCommand));
    registry.register(Box::new(UnameCommand));
    registry.register(Box::new(DateCommand));
    registry.register(Box::new(ClearCommand));
    registry.register(Box::new(ResetCommand));
    registry.register(Box::new(ExitCommand));
    registry.register(Box::new(HelpCommand));
}

pub fn register_network(registry: &mut CommandRegistry) {
    registry.register(Box::new(CurlCommand));
    registry.register(Box::new(WgetCommand));
    registry.register(Box::new(ApiCommand));
}

/// 创建包含全部命令的注册表
pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_filesystem(&mut registry);
    register_session(&mut registry);
    register_system(&mut registry);
    register_network(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = create_default_registry();
        for name in ["ls", "cd", "tar", "fg", "source", ".", "bash", "uname", "curl", "api", "exit"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(!registry.contains("python3"));
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
