// src/commands/types.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::registry::CommandRegistry;
use crate::config::ShellConfig;
use crate::fs::{FileSystem, FsError};
use crate::managers::{AliasManager, EnvManager, JobManager, ScriptFunction};
use crate::utils::{expand_tilde, resolve_path};

pub use crate::network::{FetchFn, FetchResponse};

/// Editor flavour requested by `nano` / `vim`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Nano,
    Vim,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Nano => "nano",
            EditorKind::Vim => "vim",
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Out-of-band request for whatever front end renders the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    OpenEditor { path: String, editor: EditorKind },
    ClearScreen,
    Exit,
}

/// Mutable per-session state threaded through every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub cwd: String,
    pub aliases: AliasManager,
    pub env: EnvManager,
    pub jobs: JobManager,
    pub functions: HashMap<String, ScriptFunction>,
    pub history: Vec<String>,
}

impl Session {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            cwd: config.initial_dir.clone(),
            aliases: AliasManager::new(),
            env: EnvManager::new(config),
            jobs: JobManager::new(),
            functions: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Change the working directory and keep `PWD`/`OLDPWD` in step.
    pub fn set_current_dir(&mut self, dir: &str) {
        if dir != self.cwd {
            self.env.update_pwd(dir);
        }
        self.cwd = dir.to_string();
    }

    pub fn home(&self) -> &str {
        self.env.get("HOME").unwrap_or("/")
    }

    /// Append to history, dropping consecutive duplicates and the oldest
    /// entries beyond `cap`.
    pub fn push_history(&mut self, line: &str, cap: usize) {
        if self.history.last().map(String::as_str) == Some(line) {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub output: String,
    pub success: bool,
    pub action: Option<UiAction>,
    /// Command lines the chain should run on this command's behalf.
    pub delegate: Vec<String>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
            action: None,
            delegate: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::success(String::new())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            success: false,
            action: None,
            delegate: Vec::new(),
        }
    }

    pub fn from_fs(result: Result<(), FsError>) -> Self {
        match result {
            Ok(()) => Self::empty(),
            Err(e) => Self::error(e.to_string()),
        }
    }

    pub fn with_action(mut self, action: UiAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn delegating(output: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            delegate: lines,
            ..Self::success(output)
        }
    }

    /// Output as shown to the user: failures carry the `error: ` prefix.
    pub fn rendered(&self) -> String {
        if self.success || self.output.starts_with("error:") {
            self.output.clone()
        } else {
            format!("error: {}", self.output)
        }
    }
}

/// 命令执行上下文
pub struct CommandContext<'a> {
    pub args: Vec<String>,
    /// Output of the previous pipe stage.
    pub input: Option<String>,
    pub session: &'a mut Session,
    pub config: &'a ShellConfig,
    pub fs: Arc<dyn FileSystem>,
    pub fetch_fn: Option<FetchFn>,
    /// Lookup for `which`, `type` and `help`.
    pub registry: &'a CommandRegistry,
}

impl<'a> CommandContext<'a> {
    pub fn cwd(&self) -> &str {
        &self.session.cwd
    }

    /// Absolute, normalized form of a user-supplied path.
    pub fn resolve(&self, path: &str) -> Result<String, FsError> {
        let expanded = expand_tilde(path, self.session.home());
        resolve_path(&self.session.cwd, &expanded)
    }

    pub fn set_current_dir(&mut self, dir: &str) {
        self.session.set_current_dir(dir);
    }

    /// Display form of `path` with the home directory shown as `~`.
    pub fn display_path(&self, path: &str) -> String {
        crate::utils::to_display_path(path, self.session.home())
    }
}

/// 命令 trait
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    /// One-line summary used by `help` and `type`.
    fn summary(&self) -> &'static str {
        ""
    }
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_prefix() {
        assert_eq!(CommandResult::success("ok").rendered(), "ok");
        assert_eq!(CommandResult::error("boom").rendered(), "error: boom");
        assert_eq!(CommandResult::error("error: boom").rendered(), "error: boom");
    }

    #[test]
    fn test_history_cap_and_dedup() {
        let mut session = Session::new(&ShellConfig::default());
        for line in ["a", "a", "b", "c", "d"] {
            session.push_history(line, 3);
        }
        assert_eq!(session.history, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_set_current_dir_updates_env() {
        let mut session = Session::new(&ShellConfig::default());
        session.set_current_dir("/tmp");
        assert_eq!(session.cwd, "/tmp");
        assert_eq!(session.env.get("PWD"), Some("/tmp"));
        assert_eq!(session.env.get("OLDPWD"), Some("/home/user"));
    }
}
