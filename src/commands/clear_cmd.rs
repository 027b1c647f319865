use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult, UiAction};

pub struct ClearCommand;
pub struct ResetCommand;
pub struct ExitCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn summary(&self) -> &'static str {
        "clear the terminal screen"
    }

    async fn execute(&self, _ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::empty().with_action(UiAction::ClearScreen)
    }
}

#[async_trait]
impl Command for ResetCommand {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn summary(&self) -> &'static str {
        "restore the default filesystem (deletes all data)"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        if let Err(e) = ctx.fs.reset().await {
            return CommandResult::error(e.to_string());
        }
        log::info!("filesystem reset by user");
        ctx.set_current_dir("/");
        CommandResult::success("Filesystem reset.")
    }
}

#[async_trait]
impl Command for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn summary(&self) -> &'static str {
        "end the session"
    }

    async fn execute(&self, _ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::empty().with_action(UiAction::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;
    use crate::fs::PageRequest;

    #[tokio::test]
    async fn test_clear_and_exit_actions() {
        let mut env = TestEnv::new();
        let result = ClearCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.action, Some(UiAction::ClearScreen));
        let result = ExitCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.action, Some(UiAction::Exit));
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let mut env = TestEnv::new();
        let before = env.fs.list_directory("/", PageRequest::all()).await.unwrap();
        env.fs.make_directory("/scratch", false).await.unwrap();
        env.fs.delete("/etc", true).await.unwrap();
        env.session.set_current_dir("/scratch");

        let result = ResetCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.output, "Filesystem reset.");
        assert_eq!(env.session.cwd, "/");
        let after = env.fs.list_directory("/", PageRequest::all()).await.unwrap();
        let names = |l: &crate::fs::DirectoryListing| l.entries.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&after), names(&before));
    }
}
