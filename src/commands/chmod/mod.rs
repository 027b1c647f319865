// src/commands/chmod/mod.rs
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::commands::{Command, CommandContext, CommandResult};

lazy_static! {
    static ref PERMISSIONS: Regex = Regex::new(r"^[-dlrwxstugo]{9,10}$").unwrap();
}

pub struct ChmodCommand;

#[async_trait]
impl Command for ChmodCommand {
    fn name(&self) -> &'static str {
        "chmod"
    }

    fn summary(&self) -> &'static str {
        "change file permissions"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let (Some(permissions), Some(path)) = (ctx.args.first(), ctx.args.get(1)) else {
            return CommandResult::error("usage: chmod <permissions> <path>");
        };
        if !PERMISSIONS.is_match(permissions) {
            return CommandResult::error(
                "invalid permissions format. Use format like 'rw-r--r--' or 'drwxr-xr-x'",
            );
        }
        let path = match ctx.resolve(path) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(e.to_string()),
        };

        // a bare 9-character mode keeps the node's type flag
        let permissions = if permissions.len() == 9 {
            let flag = if ctx.fs.get_directory(&path).await.is_ok() { 'd' } else { '-' };
            format!("{}{}", flag, permissions)
        } else {
            permissions.clone()
        };
        CommandResult::from_fs(ctx.fs.change_permissions(&path, &permissions).await)
    }
}
