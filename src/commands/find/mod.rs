// src/commands/find/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::ItemKind;

pub struct FindCommand;

const HELP: &str = "Usage: find [PATTERN] [file|directory|symlink] [PATH]\n\
   or: find PATTERN PATH\n\n\
Search for files below PATH (default: current directory).\n\n\
PATTERN is '*' for everything, a glob such as '*.rs', or a substring of the name.\n";

#[async_trait]
impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn summary(&self) -> &'static str {
        "search for files in a directory hierarchy"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.iter().any(|a| a == "--help") {
            return CommandResult::success(HELP);
        }
        let pattern = ctx.args.first().map(String::as_str).unwrap_or("*");
        // `find PATTERN PATH` is accepted when the second operand is not a type
        let (kind, path) = match (ctx.args.get(1), ctx.args.get(2)) {
            (None, _) => (None, None),
            (Some(k), path) => match (ItemKind::from_str(k), path) {
                (Some(kind), path) => (Some(kind), path),
                (None, None) => (None, Some(k)),
                (None, Some(_)) => return CommandResult::error(format!("find: unknown type: {}", k)),
            },
        };
        let start = match ctx.resolve(path.map(String::as_str).unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(e.to_string()),
        };

        match ctx.fs.find_files(&start, pattern, kind).await {
            Ok(found) if found.is_empty() => CommandResult::success("No files found matching the criteria."),
            Ok(found) => CommandResult::success(
                found
                    .iter()
                    .map(|item| format!("{} {}", item.long_prefix(), item.full_path))
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
    async fn test_find_by_glob_and_substring() {
        let mut env = TestEnv::new();
        let result = FindCommand.execute(env.ctx(vec!["*.rs", "file", "/zk-terminal"])).await;
        assert!(result.success);
        assert!(result.output.ends_with(" /zk-terminal/src/main.rs"));

        let result = FindCommand.execute(env.ctx(vec!["main", "file", "/"])).await;
        assert!(result.output.contains("/zk-terminal/src/main.rs"));
    }

    #[tokio::test]
    async fn test_find_type_filter() {
        let mut env = TestEnv::new();
        let result = FindCommand.execute(env.ctx(vec!["*", "directory", "/zk-terminal"])).await;
        assert!(result.output.contains("/zk-terminal/src"));
        assert!(!result.output.contains("main.rs"));
        let result = FindCommand.execute(env.ctx(vec!["*", "socket"])).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_find_pattern_then_path() {
        let mut env = TestEnv::new();
        let result = FindCommand.execute(env.ctx(vec!["main", "/zk-terminal"])).await;
        assert!(result.success, "{}", result.output);
        assert!(result.output.contains(" /zk-terminal/src/main.rs"));

        let result = FindCommand.execute(env.ctx(vec!["main", "/missing"])).await;
        assert!(!result.success);
        let result = FindCommand.execute(env.ctx(vec!["main", "sock", "/zk-terminal"])).await;
        assert_eq!(result.output, "find: unknown type: sock");
    }

    #[tokio::test]
    async fn test_find_nothing() {
        let mut env = TestEnv::new();
        let result = FindCommand.execute(env.ctx(vec!["no-such-name-anywhere"])).await;
        assert_eq!(result.output, "No files found matching the criteria.");
        let result = FindCommand.execute(env.ctx(vec!["*", "file", "/missing"])).await;
        assert!(!result.success);
    }
}
