// src/commands/touch/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::FileSystemItem;

pub struct TouchCommand;

#[async_trait]
impl Command for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn summary(&self) -> &'static str {
        "create empty files or update their timestamps"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let files: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-')).collect();
        if files.is_empty() {
            return CommandResult::error("touch: missing file operand");
        }

        let mut errors = Vec::new();
        for file in files {
            let path = match ctx.resolve(file) {
                Ok(p) => p,
                Err(e) => {
                    errors.push(e.to_string());
                    continue;
                }
            };
            let outcome = match ctx.fs.get_item(&path).await {
                // rewriting the same content refreshes the modification time
                Ok(FileSystemItem::File(f)) => ctx.fs.write_file_unsafe(&path, &f.content).await,
                Ok(_) => Ok(()),
                Err(_) => ctx.fs.create_file(&path, "").await,
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
