//! `source`, `.` and `bash`: scripts run by handing their lines back to the chain.

use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::managers::{substitute_positional, ScriptRunner, ScriptStep};

pub struct SourceCommand;
pub struct DotCommand;
pub struct BashCommand;

const BASH_VERSION: &str = "GNU bash, version 5.2.15(1)-release (zk-terminal)";

/// Read `file`, record its functions in the session, and return the
/// remaining lines for the chain to run with `args` as `$1`...
async fn run_script(mut ctx: CommandContext<'_>, name: &str, file: &str, args: &[String]) -> CommandResult {
    let path = match ctx.resolve(file) {
        Ok(p) => p,
        Err(e) => return CommandResult::error(format!("{}: {}", name, e)),
    };
    let content = match ctx.fs.read_file(&path).await {
        Ok(c) => c,
        Err(e) => return CommandResult::error(format!("{}: {}", name, e)),
    };

    let mut lines = Vec::new();
    for step in ScriptRunner::parse(&content) {
        match step {
            ScriptStep::Assign { name, value } => {
                let value = substitute_positional(&value, args).replace('"', "\\\"");
                lines.push(format!("export {}=\"{}\"", name, value));
            }
            ScriptStep::Define(function) => {
                ctx.session.functions.insert(function.name.clone(), function);
            }
            ScriptStep::Run(line) => lines.push(substitute_positional(&line, args)),
        }
    }
    log::debug!("{}: {} runs {} lines", name, path, lines.len());
    CommandResult::delegating("", lines)
}

async fn source(ctx: CommandContext<'_>, name: &str) -> CommandResult {
    let Some((file, args)) = ctx.args.split_first() else {
        return CommandResult::error(format!("{}: filename argument required", name));
    };
    let (file, args) = (file.clone(), args.to_vec());
    run_script(ctx, name, &file, &args).await
}

#[async_trait]
impl Command for SourceCommand {
    fn name(&self) -> &'static str {
        "source"
    }

    fn summary(&self) -> &'static str {
        "execute commands from a file in the current shell"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        source(ctx, "source").await
    }
}

#[async_trait]
impl Command for DotCommand {
    fn name(&self) -> &'static str {
        "."
    }

    fn summary(&self) -> &'static str {
        "execute commands from a file in the current shell"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        source(ctx, ".").await
    }
}

#[async_trait]
impl Command for BashCommand {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn summary(&self) -> &'static str {
        "run a command string or script file"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        match ctx.args.first().map(String::as_str) {
            None => CommandResult::empty(),
            Some("--version") => CommandResult::success(BASH_VERSION),
            Some("-c") => match ctx.args.get(1) {
                Some(script) => CommandResult::delegating("", vec![script.clone()]),
                None => CommandResult::error("bash: -c: option requires an argument"),
            },
            Some(flag) if flag.starts_with('-') => {
                CommandResult::error(format!("bash: {}: invalid option", flag))
            }
            Some(file) => {
                let file = file.to_string();
                let args = ctx.args[1..].to_vec();
                run_script(ctx, "bash", &file, &args).await
            }
        }
    }
}
