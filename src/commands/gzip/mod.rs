// src/commands/gzip/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct GzipCommand;
pub struct GunzipCommand;

fn operand(ctx: &CommandContext<'_>) -> Option<String> {
    ctx.args.iter().find(|a| !a.starts_with('-')).cloned()
}

#[async_trait]
impl Command for GzipCommand {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn summary(&self) -> &'static str {
        "compress a file to FILE.gz"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some(file) = operand(&ctx) else {
            return CommandResult::error("usage: gzip <file>");
        };
        match ctx.resolve(&file) {
            Ok(path) => CommandResult::from_fs(ctx.fs.compress_file(&path).await.map(|_| ())),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }
}

#[async_trait]
impl Command for GunzipCommand {
    fn name(&self) -> &'static str {
        "gunzip"
    }

    fn summary(&self) -> &'static str {
        "restore a file compressed with gzip"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some(file) = operand(&ctx) else {
            return CommandResult::error("usage: gunzip <file>");
        };
        match ctx.resolve(&file) {
            Ok(path) => CommandResult::from_fs(ctx.fs.decompress_file(&path).await.map(|_| ())),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }
}
