//! Shell facade
//!
//! Owns the filesystem, the session and the chain handler, and exposes the
//! line-at-a-time API the CLI (or any other front end) drives.

use std::sync::Arc;
use std::time::Duration;

use crate::commands::{create_default_registry, FetchFn, Session};
use crate::config::ShellConfig;
use crate::fs::{BackendStore, CachedStore, FileSystem, MemoryBackend, StorageBackend, TreeFs};
use crate::interpreter::{ChainHandler, Dispatcher, ExecResult};

/// Options for creating a [`Shell`].
#[derive(Default)]
pub struct ShellOptions {
    pub config: ShellConfig,
    /// Persistence backend (defaults to an in-process `MemoryBackend`)
    pub backend: Option<Arc<dyn StorageBackend>>,
    /// HTTP transport for `curl`, `wget` and `api`
    pub fetch_fn: Option<FetchFn>,
    /// Starting directory (defaults to `config.initial_dir`)
    pub cwd: Option<String>,
}

pub struct Shell {
    fs: Arc<dyn FileSystem>,
    session: Session,
    chain: ChainHandler,
}

impl Shell {
    pub fn new(options: ShellOptions) -> Self {
        let config = options.config;
        let backend = options.backend.unwrap_or_else(|| Arc::new(MemoryBackend::new()));
        let store = BackendStore::new(backend, &config.storage_key, config.seed_options());
        let store = CachedStore::new(store, Duration::from_secs(config.cache_ttl_secs));
        let fs: Arc<dyn FileSystem> =
            Arc::new(TreeFs::new(Arc::new(store), &config.username).with_max_file_size(config.max_file_size));

        let mut session = Session::new(&config);
        if let Some(cwd) = options.cwd {
            session.set_current_dir(&cwd);
        }
        let dispatcher = Dispatcher::new(create_default_registry(), Arc::new(config), fs.clone(), options.fetch_fn);

        Self {
            fs,
            session,
            chain: ChainHandler::new(dispatcher),
        }
    }

    /// Run one interactive line, subject to the rate limit.
    pub async fn execute(&mut self, line: &str) -> ExecResult {
        self.chain.execute(&mut self.session, line, false).await
    }

    /// Run a multi-line script: each non-blank, non-comment line is one
    /// submission, none of them rate limited.
    pub async fn run_script(&mut self, script: &str) -> ExecResult {
        let mut outputs = Vec::new();
        let mut actions = Vec::new();
        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let result = self.chain.execute(&mut self.session, line, true).await;
            if !result.output.is_empty() {
                outputs.push(result.output);
            }
            actions.extend(result.actions);
        }
        ExecResult {
            output: outputs.join("\n"),
            actions,
            cwd: self.session.cwd.clone(),
        }
    }

    /// Source `~/.bashrc` when it exists.
    pub async fn load_rc(&mut self) -> Option<ExecResult> {
        let rc = format!("{}/.bashrc", self.session.home().trim_end_matches('/'));
        if self.fs.read_file(&rc).await.is_err() {
            return None;
        }
        log::debug!("shell: sourcing {}", rc);
        Some(self.chain.execute(&mut self.session, &format!("source {}", rc), true).await)
    }

    pub fn cwd(&self) -> &str {
        &self.session.cwd
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// `user@host:~/dir$ `
    pub fn prompt(&self) -> String {
        let config = self.chain.dispatcher().config();
        let user = self.session.env.get("USER").unwrap_or(config.username.as_str());
        let host = self.session.env.get("HOSTNAME").unwrap_or(config.hostname.as_str());
        let dir = crate::utils::to_display_path(&self.session.cwd, self.session.home());
        format!("{}@{}:{}$ ", user, host, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::UiAction;

    fn shell() -> Shell {
        Shell::new(ShellOptions {
            config: ShellConfig { rate_limit_ms: 0, ..Default::default() },
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_execute_and_prompt() {
        let mut shell = shell();
        assert_eq!(shell.prompt(), "user@zk-terminal:~$ ");
        let result = shell.execute("mkdir projects && cd projects").await;
        assert_eq!(result.output, "");
        assert_eq!(shell.cwd(), "/home/user/projects");
        assert_eq!(shell.prompt(), "user@zk-terminal:~/projects$ ");
    }

    #[tokio::test]
    async fn test_run_script_skips_comments() {
        let mut shell = shell();
        let result = shell.run_script("# setup\necho one\n\ncd /tmp\npwd\nexit\n").await;
        assert_eq!(result.output, "one\n/tmp");
        assert_eq!(result.actions, vec![UiAction::Exit]);
    }

    #[tokio::test]
    async fn test_load_rc_defines_aliases() {
        let mut shell = shell();
        assert!(shell.load_rc().await.is_some());
        assert_eq!(shell.session().aliases.get("ll"), Some("ls -l"));
        assert_eq!(shell.session().env.get("EDITOR"), Some("nano"));
    }

    #[tokio::test]
    async fn test_state_survives_through_backend() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let options = || ShellOptions {
            config: ShellConfig { rate_limit_ms: 0, cache_ttl_secs: 0, ..Default::default() },
            backend: Some(backend.clone()),
            ..Default::default()
        };
        let mut first = Shell::new(options());
        first.execute("echo kept > /tmp/note.txt").await;

        let mut second = Shell::new(options());
        assert_eq!(second.execute("cat /tmp/note.txt").await.output, "kept");
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let mut shell = shell();
        shell.execute("mkdir /scratch").await;
        assert!(shell.execute("ls /").await.output.contains("scratch/"));
        assert_eq!(shell.execute("reset").await.output, "Filesystem reset.");
        assert!(!shell.execute("ls /").await.output.contains("scratch/"));
        assert_eq!(shell.cwd(), "/");
    }
}
