// src/commands/grep/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct GrepCommand;

const HELP: &str = "Usage: grep PATTERN [PATH] [-i]\n\n\
Search file contents below PATH (default: current directory) for PATTERN.\n\
When input is piped, matching input lines are printed instead.\n\n\
Options:\n\
  -i    ignore case distinctions\n";

#[async_trait]
impl Command for GrepCommand {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn summary(&self) -> &'static str {
        "print lines that match a pattern"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut ignore_case = false;
        let mut operands = Vec::new();
        for arg in &ctx.args {
            match arg.as_str() {
                "--help" => return CommandResult::success(HELP),
                "-i" | "--ignore-case" => ignore_case = true,
                // --color and friends come from the default aliases
                a if a.starts_with('-') && a.len() > 1 => {}
                _ => operands.push(arg.as_str()),
            }
        }
        let Some(pattern) = operands.first().copied() else {
            return CommandResult::error("usage: grep <pattern> [path] [-i for case insensitive]");
        };

        if let (Some(input), None) = (&ctx.input, operands.get(1)) {
            let needle = if ignore_case { pattern.to_lowercase() } else { pattern.to_string() };
            let lines: Vec<&str> = input
                .lines()
                .filter(|line| {
                    if ignore_case {
                        line.to_lowercase().contains(&needle)
                    } else {
                        line.contains(&needle)
                    }
                })
                .collect();
            return CommandResult::success(lines.join("\n"));
        }

        let start = match ctx.resolve(operands.get(1).copied().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(e.to_string()),
        };
        match ctx.fs.grep_search(&start, pattern, !ignore_case).await {
            Ok(matches) if matches.is_empty() => CommandResult::success("No matches found."),
            Ok(matches) => CommandResult::success(
                matches
                    .iter()
                    .map(|m| format!("{}:{}:{}", m.file, m.line, m.content))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_grep_files() {
        let mut env = TestEnv::new();
        env.fs.make_directory("/tmp/src", false).await.unwrap();
        env.fs.write_file("/tmp/src/a.txt", "alpha\nBeta\ngamma beta").await.unwrap();
        let result = GrepCommand.execute(env.ctx(vec!["beta", "/tmp/src"])).await;
        assert_eq!(result.output, "/tmp/src/a.txt:3:gamma beta");

        let result = GrepCommand.execute(env.ctx(vec!["--color=auto", "beta", "/tmp/src", "-i"])).await;
        assert_eq!(result.output, "/tmp/src/a.txt:2:Beta\n/tmp/src/a.txt:3:gamma beta");
    }

    #[tokio::test]
    async fn test_grep_no_match() {
        let mut env = TestEnv::new();
        let result = GrepCommand.execute(env.ctx(vec!["zzz-not-there", "/tmp"])).await;
        assert_eq!(result.output, "No matches found.");
        let result = GrepCommand.execute(env.ctx(vec![])).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_grep_piped_input() {
        let mut env = TestEnv::new();
        let result = GrepCommand.execute(env.piped(vec!["o"], "one\ntwo\nthree\nfour")).await;
        assert_eq!(result.output, "one\ntwo\nfour");
        let result = GrepCommand.execute(env.piped(vec!["-i", "T"], "one\ntwo\nthree")).await;
        assert_eq!(result.output, "two\nthree");
    }
}
