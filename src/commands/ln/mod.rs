// src/commands/ln/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct LnCommand;

#[async_trait]
impl Command for LnCommand {
    fn name(&self) -> &'static str {
        "ln"
    }

    fn summary(&self) -> &'static str {
        "make symbolic links"
    }

    /// Links are always symbolic; `-s` is accepted and ignored.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let operands: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-')).collect();
        let [target, link] = operands.as_slice() else {
            return CommandResult::error("usage: ln <target> <link_name>");
        };
        let resolved = ctx.resolve(target).and_then(|t| ctx.resolve(link).map(|l| (t, l)));
        match resolved {
            Ok((target, link)) => CommandResult::from_fs(ctx.fs.create_symlink(&target, &link).await),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }
}
