// src/commands/cat/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct CatCommand;

#[async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn summary(&self) -> &'static str {
        "print file contents"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let files: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-') || a.as_str() == "-").collect();

        if files.is_empty() {
            return CommandResult::success(ctx.input.clone().unwrap_or_default());
        }

        let mut parts = Vec::with_capacity(files.len());
        for file in files {
            if file == "-" {
                parts.push(ctx.input.clone().unwrap_or_default());
                continue;
            }
            let path = match ctx.resolve(file) {
                Ok(p) => p,
                Err(e) => return CommandResult::error(e.to_string()),
            };
            match ctx.fs.read_file(&path).await {
                Ok(content) => parts.push(content),
                Err(e) => return CommandResult::error(e.to_string()),
            }
        }
        CommandResult::success(parts.join("\n"))
    }
}
