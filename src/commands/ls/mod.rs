// src/commands/ls/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FsError, ItemKind, ItemSummary, PageRequest};

pub struct LsCommand;

const HELP: &str = "Usage: ls [-l] [PATH] [--page N] [--page-size N]\n\n\
List directory contents.\n\n\
Options:\n\
  -l               use a long listing format\n\
  --page N         show page N of the listing\n\
  --page-size N    entries per page (default 50, 20 with -l)\n";

struct LsOptions {
    long: bool,
    page: usize,
    page_size: Option<usize>,
    path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<LsOptions, String> {
    let mut opts = LsOptions { long: false, page: 1, page_size: None, path: None };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--page" => {
                let value = iter.next().ok_or("ls: option '--page' requires an argument")?;
                opts.page = value
                    .parse()
                    .map_err(|_| format!("ls: invalid page number: '{}'", value))?;
            }
            "--page-size" => {
                let value = iter.next().ok_or("ls: option '--page-size' requires an argument")?;
                opts.page_size = Some(
                    value
                        .parse()
                        .map_err(|_| format!("ls: invalid page size: '{}'", value))?,
                );
            }
            a if a.starts_with("--") => {}
            a if a.starts_with('-') && a.len() > 1 => {
                if a[1..].contains('l') {
                    opts.long = true;
                }
            }
            _ => {
                if opts.path.is_none() {
                    opts.path = Some(arg.clone());
                }
            }
        }
    }
    Ok(opts)
}

fn short_name(entry: &ItemSummary) -> String {
    match entry.kind {
        ItemKind::Directory => format!("{}/", entry.name),
        _ => entry.name.clone(),
    }
}

fn long_line(entry: &ItemSummary) -> String {
    match &entry.target {
        Some(target) => format!("{} {} -> {}", entry.long_prefix(), entry.name, target),
        None => format!("{} {}", entry.long_prefix(), entry.name),
    }
}

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn summary(&self) -> &'static str {
        "list directory contents"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.iter().any(|a| a == "--help") {
            return CommandResult::success(HELP);
        }
        let opts = match parse_args(&ctx.args) {
            Ok(opts) => opts,
            Err(e) => return CommandResult::error(e),
        };
        let path = match ctx.resolve(opts.path.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(e.to_string()),
        };
        let default_size = if opts.long { ctx.config.long_page_size } else { ctx.config.page_size };
        let request = PageRequest::new(opts.page, opts.page_size.unwrap_or(default_size));

        let listing = match ctx.fs.list_directory(&path, request).await {
            Ok(listing) => listing,
            Err(FsError::NotADirectory { .. }) => {
                // a plain file lists as itself
                return match ctx.fs.get_item(&path).await {
                    Ok(item) if opts.long => CommandResult::success(long_line(&item.summary())),
                    Ok(item) => CommandResult::success(short_name(&item.summary())),
                    Err(e) => CommandResult::error(e.to_string()),
                };
            }
            Err(e) => return CommandResult::error(e.to_string()),
        };

        if opts.long && listing.total == 0 {
            return CommandResult::success("Directory is empty.");
        }

        let body = if opts.long {
            listing.entries.iter().map(long_line).collect::<Vec<_>>().join("\n")
        } else {
            listing.entries.iter().map(short_name).collect::<Vec<_>>().join(" ")
        };
        let command = if opts.long { "ls -l" } else { "ls" };
        let output = match listing.footer(command) {
            Some(footer) if body.is_empty() => footer,
            Some(footer) => format!("{}\n{}", body, footer),
            None => body,
        };
        CommandResult::success(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    async fn env_with_files(count: usize) -> TestEnv {
        let env = TestEnv::new();
        env.fs.make_directory("/tmp/many", false).await.unwrap();
        for i in 0..count {
            env.fs.create_file(&format!("/tmp/many/f{:02}", i), "").await.unwrap();
        }
        env
    }

    #[tokio::test]
    async fn test_ls_short() {
        let mut env = TestEnv::new();
        let result = LsCommand.execute(env.ctx(vec![])).await;
        assert!(result.success);
        assert!(result.output.contains("Documents/"));
        assert!(result.output.contains(".bashrc"));
    }

    #[tokio::test]
    async fn test_ls_ignores_alias_flags() {
        let mut env = TestEnv::new();
        let result = LsCommand.execute(env.ctx(vec!["--color=auto", "-CF", "/"])).await;
        assert!(result.success);
        assert!(result.output.contains("home/"));
    }

    #[tokio::test]
    async fn test_ls_long_and_symlink() {
        let mut env = TestEnv::new();
        let result = LsCommand.execute(env.ctx(vec!["-la", "~"])).await;
        assert!(result.success);
        assert!(result.output.contains("drwxr-xr-x user users 4096"));
        assert!(result.output.contains("zk-terminal -> /zk-terminal"));
    }

    #[tokio::test]
    async fn test_ls_empty_dir() {
        let mut env = TestEnv::new();
        env.fs.make_directory("/tmp/empty", false).await.unwrap();
        let result = LsCommand.execute(env.ctx(vec!["-l", "/tmp/empty"])).await;
        assert_eq!(result.output, "Directory is empty.");
        let result = LsCommand.execute(env.ctx(vec!["/tmp/empty"])).await;
        assert_eq!(result.output, "");
    }

    #[tokio::test]
    async fn test_ls_pagination() {
        let mut env = env_with_files(25).await;
        let result = LsCommand.execute(env.ctx(vec!["-l", "/tmp/many"])).await;
        let lines: Vec<&str> = result.output.lines().collect();
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[20], "... and 5 more items. Use 'ls -l --page 2' to see next page.");
        assert_eq!(lines[21], "Page 1 of 2 (25 total items)");

        let result = LsCommand.execute(env.ctx(vec!["-l", "/tmp/many", "--page", "2"])).await;
        let lines: Vec<&str> = result.output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with(" f20"));
        assert_eq!(lines[5], "Page 2 of 2 (25 total items)");

        let result = LsCommand.execute(env.ctx(vec!["/tmp/many", "--page-size", "10", "--page", "3"])).await;
        assert_eq!(result.output, "f20 f21 f22 f23 f24\nPage 3 of 3 (25 total items)");
    }

    #[tokio::test]
    async fn test_ls_huge_page_numbers() {
        let mut env = env_with_files(5).await;
        let max = usize::MAX.to_string();
        let result = LsCommand
            .execute(env.ctx(vec!["/tmp/many", "--page", max.as_str(), "--page-size", "2"]))
            .await;
        assert!(result.success);
        assert_eq!(result.output, format!("Page {} of 3 (5 total items)", max));

        let result = LsCommand.execute(env.ctx(vec!["/tmp/many", "--page-size", max.as_str()])).await;
        assert_eq!(result.output, "f00 f01 f02 f03 f04");
    }

    #[tokio::test]
    async fn test_ls_errors() {
        let mut env = TestEnv::new();
        let result = LsCommand.execute(env.ctx(vec!["/nope"])).await;
        assert!(!result.success);
        assert!(result.rendered().starts_with("error: no such file or directory"));
        let result = LsCommand.execute(env.ctx(vec!["--page", "x"])).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_ls_file() {
        let mut env = TestEnv::new();
        let result = LsCommand.execute(env.ctx(vec!["/etc/hostname"])).await;
        assert_eq!(result.output, "hostname");
    }
}
