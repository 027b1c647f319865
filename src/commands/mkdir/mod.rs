// src/commands/mkdir/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct MkdirCommand;

#[async_trait]
impl Command for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn summary(&self) -> &'static str {
        "create directories"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.iter().any(|a| a == "--help") {
            return CommandResult::success(
                "Usage: mkdir [-p] DIRECTORY...\n\n\
                 Create the DIRECTORY(ies), if they do not already exist.\n\n\
                 Options:\n\
                   -p, --parents    no error if existing, make parent directories as needed\n",
            );
        }

        let mut parents = false;
        let mut dirs: Vec<&String> = Vec::new();
        for arg in &ctx.args {
            match arg.as_str() {
                "-p" | "--parents" => parents = true,
                _ if !arg.starts_with('-') => dirs.push(arg),
                _ => {}
            }
        }

        if dirs.is_empty() {
            return CommandResult::error("mkdir: missing operand");
        }

        let mut errors = Vec::new();
        for dir in dirs {
            let outcome = match ctx.resolve(dir) {
                Ok(path) => ctx.fs.make_directory(&path, parents).await,
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                errors.push(e.to_string());
            }
        }

        if errors.is_empty() {
            CommandResult::empty()
        } else {
            CommandResult::error(errors.join("\n"))
        }
    }
}
