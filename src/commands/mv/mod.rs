// src/commands/mv/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FileSystem, FsError, ItemKind};
use crate::utils::{basename, path_join};

pub struct MvCommand;

/// Operands of `mv`/`cp`, resolved to absolute paths.
pub(crate) struct Transfer {
    pub sources: Vec<String>,
    pub dest: String,
}

/// Split flags from operands and resolve them. Flags are ignored.
pub(crate) fn parse_transfer(ctx: &CommandContext<'_>, name: &str) -> Result<Transfer, String> {
    let operands: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-')).collect();
    if operands.len() < 2 {
        return Err(format!("{}: missing source or destination", name));
    }
    let resolve = |p: &String| ctx.resolve(p).map_err(|e| e.to_string());
    let (dest, sources) = operands.split_last().ok_or_else(|| format!("{}: missing operand", name))?;
    Ok(Transfer {
        sources: sources.iter().map(|s| resolve(s)).collect::<Result<_, _>>()?,
        dest: resolve(dest)?,
    })
}

/// Where `src` lands: inside `dest` when `dest` is a directory and `src`
/// is not (or when several sources are given), otherwise at `dest` itself.
pub(crate) async fn target_for(
    fs: &dyn FileSystem,
    src: &str,
    dest: &str,
    many: bool,
) -> Result<String, FsError> {
    let src_kind = fs.get_item(src).await?.kind();
    let dest_is_dir = fs.get_directory(dest).await.is_ok();
    if dest_is_dir && (many || src_kind != ItemKind::Directory) {
        Ok(path_join(dest, &[&basename(src)]))
    } else {
        Ok(dest.to_string())
    }
}

#[async_trait]
impl Command for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn summary(&self) -> &'static str {
        "move or rename files and directories"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let transfer = match parse_transfer(&ctx, "mv") {
            Ok(t) => t,
            Err(e) => return CommandResult::error(e),
        };
        let many = transfer.sources.len() > 1;
        if many && ctx.fs.get_directory(&transfer.dest).await.is_err() {
            return CommandResult::error(format!("mv: target is not a directory: {}", transfer.dest));
        }

        let mut errors = Vec::new();
        for src in &transfer.sources {
            let outcome = match target_for(ctx.fs.as_ref(), src, &transfer.dest, many).await {
                Ok(target) => ctx.fs.move_item(src, &target).await,
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
