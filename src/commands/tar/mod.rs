// src/commands/tar/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct TarCommand;

const USAGE: &str = "usage: tar -c -f <archive> <files...> | tar -x -f <archive> [destination]";

#[derive(Debug, PartialEq)]
enum TarMode {
    Create { archive: String, sources: Vec<String> },
    Extract { archive: String, dest: Option<String> },
}

/// `-c`/`-x` may be combined with `-f` (`-cf`, `-xzf`); `-z` and `-v` are accepted.
fn parse_args(args: &[String]) -> Result<TarMode, &'static str> {
    let mut create = false;
    let mut extract = false;
    let mut has_file = false;
    let mut operands = Vec::new();
    for arg in args {
        match arg.strip_prefix('-') {
            Some(flags) if !flags.is_empty() => {
                for flag in flags.chars() {
                    match flag {
                        'c' => create = true,
                        'x' => extract = true,
                        'f' => has_file = true,
                        'z' | 'v' => {}
                        _ => return Err(USAGE),
                    }
                }
            }
            _ => operands.push(arg.clone()),
        }
    }
    if !has_file || create == extract || operands.is_empty() {
        return Err(USAGE);
    }
    let archive = operands.remove(0);
    if create {
        if operands.is_empty() {
            return Err("usage: tar -c -f <archive> <files...>");
        }
        Ok(TarMode::Create { archive, sources: operands })
    } else {
        Ok(TarMode::Extract { archive, dest: operands.into_iter().next() })
    }
}

#[async_trait]
impl Command for TarCommand {
    fn name(&self) -> &'static str {
        "tar"
    }

    fn summary(&self) -> &'static str {
        "create or extract tar archives"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mode = match parse_args(&ctx.args) {
            Ok(mode) => mode,
            Err(usage) => return CommandResult::error(usage),
        };
        let outcome = match mode {
            TarMode::Create { archive, sources } => {
                let resolved: Result<Vec<String>, _> = sources.iter().map(|s| ctx.resolve(s)).collect();
                match (ctx.resolve(&archive), resolved) {
                    (Ok(archive), Ok(sources)) => ctx
                        .fs
                        .create_archive(&archive, &sources, ctx.cwd())
                        .await
                        .map(|count| log::debug!("tar: packed {} members into {}", count, archive)),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
            TarMode::Extract { archive, dest } => {
                let dest = dest.as_deref().unwrap_or(".");
                match (ctx.resolve(&archive), ctx.resolve(dest)) {
                    (Ok(archive), Ok(dest)) => ctx.fs.extract_archive(&archive, &dest).await.map(|_| ()),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
        };
        CommandResult::from_fs(outcome)
    }
}
