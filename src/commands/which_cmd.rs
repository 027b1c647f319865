use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct WhichCommand;
pub struct TypeCommand;

/// Verbs that `type` reports as builtins rather than as files on `PATH`.
const SHELL_BUILTINS: &[&str] = &[
    ".", "alias", "bg", "cd", "echo", "exit", "export", "fg", "help", "history", "jobs", "kill",
    "pwd", "source", "type", "unalias", "unset",
];

const BIN_DIR: &str = "/usr/bin";

fn operands(ctx: &CommandContext<'_>) -> Vec<String> {
    ctx.args.iter().filter(|a| !a.starts_with('-')).cloned().collect()
}

#[async_trait]
impl Command for WhichCommand {
    fn name(&self) -> &'static str {
        "which"
    }

    fn summary(&self) -> &'static str {
        "locate a command"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let names = operands(&ctx);
        if names.is_empty() {
            return CommandResult::error("which: missing command name");
        }
        let path_var = ctx.session.env.get("PATH").unwrap_or(BIN_DIR);
        let mut lines = Vec::new();
        let mut all_found = true;
        for name in &names {
            if ctx.registry.contains(name) {
                lines.push(format!("{}/{}", BIN_DIR, name));
            } else {
                all_found = false;
                lines.push(format!("which: no {} in ({})", name, path_var));
            }
        }
        if all_found {
            CommandResult::success(lines.join("\n"))
        } else {
            CommandResult::error(lines.join("\n"))
        }
    }
}

#[async_trait]
impl Command for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn summary(&self) -> &'static str {
        "describe how a name would be interpreted"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let names = operands(&ctx);
        if names.is_empty() {
            return CommandResult::error("type: missing command name");
        }
        let mut lines = Vec::new();
        let mut all_found = true;
        for name in &names {
            let line = if let Some(body) = ctx.session.aliases.get(name) {
                format!("{} is aliased to `{}'", name, body)
            } else if ctx.session.functions.contains_key(name) {
                format!("{} is a function", name)
            } else if SHELL_BUILTINS.contains(&name.as_str()) {
                format!("{} is a shell builtin", name)
            } else if ctx.registry.contains(name) {
                format!("{} is {}/{}", name, BIN_DIR, name)
            } else {
                all_found = false;
                format!("type: {}: not found", name)
            };
            lines.push(line);
        }
        if all_found {
            CommandResult::success(lines.join("\n"))
        } else {
            CommandResult::error(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;
    use crate::managers::ScriptFunction;

    #[tokio::test]
    async fn test_which() {
        let mut env = TestEnv::new();
        let result = WhichCommand.execute(env.ctx(vec!["ls", "grep"])).await;
        assert_eq!(result.output, "/usr/bin/ls\n/usr/bin/grep");
        let result = WhichCommand.execute(env.ctx(vec!["ls", "gcc"])).await;
        assert!(!result.success);
        assert!(result.output.contains("which: no gcc in ("));
    }

    #[tokio::test]
    async fn test_type_kinds() {
        let mut env = TestEnv::new();
        env.session.functions.insert(
            "greet".to_string(),
            ScriptFunction { name: "greet".to_string(), body: vec!["echo hi".to_string()] },
        );
        let result = TypeCommand.execute(env.ctx(vec!["ll", "greet", "cd", "tar"])).await;
        assert_eq!(
            result.output,
            "ll is aliased to `ls -l'\ngreet is a function\ncd is a shell builtin\ntar is /usr/bin/tar"
        );
        let result = TypeCommand.execute(env.ctx(vec!["nope"])).await;
        assert_eq!(result.rendered(), "error: type: nope: not found");
    }
}
