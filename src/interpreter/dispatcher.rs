//! Maps a parsed command onto a script function or a registered handler.

use std::sync::Arc;

use super::errors::ShellError;
use super::parser::ParsedCommand;
use crate::commands::{CommandContext, CommandRegistry, CommandResult, FetchFn, Session};
use crate::config::ShellConfig;
use crate::fs::FileSystem;

pub struct Dispatcher {
    registry: CommandRegistry,
    config: Arc<ShellConfig>,
    fs: Arc<dyn FileSystem>,
    fetch_fn: Option<FetchFn>,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        config: Arc<ShellConfig>,
        fs: Arc<dyn FileSystem>,
        fetch_fn: Option<FetchFn>,
    ) -> Self {
        Self { registry, config, fs, fetch_fn }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Run one command. Functions shadow handlers and expand to their
    /// body lines for the chain to run.
    pub async fn dispatch(
        &self,
        session: &mut Session,
        command: &ParsedCommand,
        input: Option<String>,
    ) -> CommandResult {
        if let Some(function) = session.functions.get(&command.name) {
            log::debug!("dispatch: function {}", command.name);
            return CommandResult::delegating("", function.invoke(&command.args));
        }

        let Some(handler) = self.registry.get(&command.name) else {
            return CommandResult::error(
                ShellError::CommandNotFound { command: command.name.clone() }.to_string(),
            );
        };
        log::debug!("dispatch: {} {:?}", command.name, command.args);

        let ctx = CommandContext {
            args: command.args.clone(),
            input,
            session,
            config: &self.config,
            fs: self.fs.clone(),
            fetch_fn: self.fetch_fn.clone(),
            registry: &self.registry,
        };
        handler.execute(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_default_registry;
    use crate::commands::test_support::make_fs;
    use crate::interpreter::parser::parse_command;
    use crate::managers::ScriptFunction;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(create_default_registry(), Arc::new(ShellConfig::default()), make_fs(), None)
    }

    #[tokio::test]
    async fn test_dispatch_handler_and_unknown() {
        let dispatcher = dispatcher();
        let mut session = Session::new(dispatcher.config());

        let pwd = parse_command("/usr/bin/pwd", "/home/user").unwrap();
        let result = dispatcher.dispatch(&mut session, &pwd, None).await;
        assert_eq!(result.output, "/home/user");

        let unknown = parse_command("python3 app.py", "/home/user").unwrap();
        let result = dispatcher.dispatch(&mut session, &unknown, None).await;
        assert_eq!(result.rendered(), "error: command not found: python3");
    }

    #[tokio::test]
    async fn test_dispatch_function_delegates() {
        let dispatcher = dispatcher();
        let mut session = Session::new(dispatcher.config());
        session.functions.insert(
            "greet".to_string(),
            ScriptFunction { name: "greet".to_string(), body: vec!["echo hi $1".to_string()] },
        );
        let cmd = parse_command("greet bob", "/home/user").unwrap();
        let result = dispatcher.dispatch(&mut session, &cmd, None).await;
        assert!(result.success);
        assert_eq!(result.delegate, vec!["echo hi bob"]);
    }
}
