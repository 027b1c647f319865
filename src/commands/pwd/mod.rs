// src/commands/pwd/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct PwdCommand;

#[async_trait]
impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn summary(&self) -> &'static str {
        "print the working directory"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        // -P prints the path with symlinks resolved
        if ctx.args.iter().any(|a| a == "-P") {
            return match ctx.fs.realpath(ctx.cwd()).await {
                Ok(p) => CommandResult::success(p),
                Err(e) => CommandResult::error(e.to_string()),
            };
        }
        CommandResult::success(ctx.cwd())
    }
}
