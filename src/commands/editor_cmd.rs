use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult, EditorKind, UiAction};
use crate::fs::FsError;

pub struct NanoCommand;
pub struct VimCommand;

/// Ask the front end to open `path` in an editor. The file need not exist yet.
async fn open_editor(ctx: CommandContext<'_>, editor: EditorKind) -> CommandResult {
    let Some(file) = ctx.args.iter().find(|a| !a.starts_with('-')) else {
        return CommandResult::error(format!("{}: missing file operand", editor));
    };
    let path = match ctx.resolve(file) {
        Ok(p) => p,
        Err(e) => return CommandResult::error(e.to_string()),
    };
    if ctx.fs.get_directory(&path).await.is_ok() {
        return CommandResult::error(FsError::IsADirectory { path }.to_string());
    }
    log::debug!("{}: opening {}", editor, path);
    CommandResult::empty().with_action(UiAction::OpenEditor { path, editor })
}

#[async_trait]
impl Command for NanoCommand {
    fn name(&self) -> &'static str {
        "nano"
    }

    fn summary(&self) -> &'static str {
        "edit a file with nano"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        open_editor(ctx, EditorKind::Nano).await
    }
}

#[async_trait]
impl Command for VimCommand {
    fn name(&self) -> &'static str {
        "vim"
    }

    fn summary(&self) -> &'static str {
        "edit a file with vim"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        open_editor(ctx, EditorKind::Vim).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_editor_action() {
        let mut env = TestEnv::new();
        let result = NanoCommand.execute(env.ctx(vec!["notes.md"])).await;
        assert!(result.success);
        assert_eq!(result.output, "");
        assert_eq!(
            result.action,
            Some(UiAction::OpenEditor {
                path: "/home/user/notes.md".to_string(),
                editor: EditorKind::Nano
            })
        );

        let result = VimCommand.execute(env.ctx(vec!["/etc/hostname"])).await;
        assert!(matches!(result.action, Some(UiAction::OpenEditor { editor: EditorKind::Vim, .. })));
    }

    #[tokio::test]
    async fn test_editor_errors() {
        let mut env = TestEnv::new();
        let result = NanoCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.rendered(), "error: nano: missing file operand");
        let result = VimCommand.execute(env.ctx(vec!["/tmp"])).await;
        assert_eq!(result.rendered(), "error: is a directory: /tmp");
        assert!(result.action.is_none());
    }
}
