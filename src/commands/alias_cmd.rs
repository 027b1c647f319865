use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::managers::{unquote, AliasManager};

pub struct AliasCommand;
pub struct UnaliasCommand;

#[async_trait]
impl Command for AliasCommand {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn summary(&self) -> &'static str {
        "define or display aliases"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.iter().any(|a| a == "--help") {
            return CommandResult::success("alias - define or display aliases\n\nUsage: alias [name[=value] ...]");
        }
        let args: Vec<String> = ctx.args.iter().filter(|a| a.as_str() != "--").cloned().collect();
        if args.is_empty() {
            return CommandResult::success(ctx.session.aliases.list());
        }

        let mut shown = Vec::new();
        let mut missing = Vec::new();
        for arg in &args {
            match arg.split_once('=') {
                Some((name, _)) if name.is_empty() => missing.push(format!("alias: `{}': invalid alias name", arg)),
                Some((name, value)) => ctx.session.aliases.set(name, unquote(value)),
                None => match ctx.session.aliases.get(arg) {
                    Some(command) => shown.push(AliasManager::format_one(arg, command)),
                    None => missing.push(format!("alias: {}: not found", arg)),
                },
            }
        }

        if missing.is_empty() {
            CommandResult::success(shown.join("\n"))
        } else {
            shown.extend(missing);
            CommandResult::error(shown.join("\n"))
        }
    }
}

#[async_trait]
impl Command for UnaliasCommand {
    fn name(&self) -> &'static str {
        "unalias"
    }

    fn summary(&self) -> &'static str {
        "remove alias definitions"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.iter().any(|a| a == "-a") {
            ctx.session.aliases.clear();
            return CommandResult::empty();
        }
        if ctx.args.is_empty() {
            return CommandResult::error("unalias: usage: unalias [-a] name [name ...]");
        }
        let missing: Vec<String> = ctx
            .args
            .iter()
            .filter(|name| !ctx.session.aliases.remove(name))
            .map(|name| format!("unalias: {}: not found", name))
            .collect();
        if missing.is_empty() {
            CommandResult::empty()
        } else {
            CommandResult::error(missing.join("\n"))
        }
    }
}
