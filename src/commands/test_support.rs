//! Shared fixtures for command tests: an isolated session over an in-memory tree.

use std::sync::Arc;

use crate::commands::{create_default_registry, CommandContext, CommandRegistry, FetchFn, Session};
use crate::config::ShellConfig;
use crate::fs::{BackendStore, FileSystem, MemoryBackend, SeedOptions, TreeFs};

pub(crate) fn make_fs() -> Arc<dyn FileSystem> {
    let store = BackendStore::new(Arc::new(MemoryBackend::new()), "data", SeedOptions::default());
    Arc::new(TreeFs::new(Arc::new(store), "user"))
}

pub(crate) struct TestEnv {
    pub fs: Arc<dyn FileSystem>,
    pub session: Session,
    pub config: ShellConfig,
    pub fetch_fn: Option<FetchFn>,
    pub registry: CommandRegistry,
}

impl TestEnv {
    pub fn new() -> Self {
        let config = ShellConfig::default();
        Self {
            fs: make_fs(),
            session: Session::new(&config),
            config,
            fetch_fn: None,
            registry: create_default_registry(),
        }
    }

    pub fn with_fetch(fetch_fn: FetchFn) -> Self {
        Self {
            fetch_fn: Some(fetch_fn),
            ..Self::new()
        }
    }

    pub fn ctx(&mut self, args: Vec<&str>) -> CommandContext<'_> {
        CommandContext {
            args: args.into_iter().map(String::from).collect(),
            input: None,
            session: &mut self.session,
            config: &self.config,
            fs: self.fs.clone(),
            fetch_fn: self.fetch_fn.clone(),
            registry: &self.registry,
        }
    }

    pub fn piped(&mut self, args: Vec<&str>, input: &str) -> CommandContext<'_> {
        let mut ctx = self.ctx(args);
        ctx.input = Some(input.to_string());
        ctx
    }
}
