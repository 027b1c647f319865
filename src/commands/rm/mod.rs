// src/commands/rm/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::FsError;

pub struct RmCommand;

#[async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn summary(&self) -> &'static str {
        "remove files or directories"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut recursive = false;
        let mut force = false;
        let mut paths: Vec<&String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "--recursive" => recursive = true,
                "--force" => force = true,
                a if a.starts_with('-') && a.len() > 1 => {
                    for flag in a[1..].chars() {
                        match flag {
                            'r' | 'R' => recursive = true,
                            'f' => force = true,
                            // -i is accepted for the default alias; there is no prompt
                            _ => {}
                        }
                    }
                }
                _ => paths.push(arg),
            }
        }

        if paths.is_empty() {
            return CommandResult::error("rm: missing operand");
        }

        let mut errors = Vec::new();
        for path in paths {
            let outcome = match ctx.resolve(path) {
                Ok(p) => ctx.fs.delete(&p, recursive).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {}
                Err(FsError::NotFound { .. }) if force => {}
                Err(e) => errors.push(e.to_string()),
            }
        }

        if errors.is_empty() {
            CommandResult::empty()
        } else {
            CommandResult::error(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_rm_file() {
        let mut env = TestEnv::new();
        env.fs.write_file("/tmp/f", "x").await.unwrap();
        let result = RmCommand.execute(env.ctx(vec!["-i", "/tmp/f"])).await;
        assert!(result.success);
        assert!(!env.fs.exists("/tmp/f").await);
    }

    #[tokio::test]
    async fn test_rm_non_empty_dir() {
        let mut env = TestEnv::new();
        env.fs.make_directory("/tmp/d/e", true).await.unwrap();
        let result = RmCommand.execute(env.ctx(vec!["/tmp/d"])).await;
        assert!(!result.success);
        assert!(result.output.contains("not empty"));
        let result = RmCommand.execute(env.ctx(vec!["-rf", "/tmp/d"])).await;
        assert!(result.success);
        assert!(!env.fs.exists("/tmp/d").await);
    }

    #[tokio::test]
    async fn test_rm_missing() {
        let mut env = TestEnv::new();
        let result = RmCommand.execute(env.ctx(vec!["/tmp/nope"])).await;
        assert!(!result.success);
        let result = RmCommand.execute(env.ctx(vec!["-f", "/tmp/nope"])).await;
        assert!(result.success);
        let result = RmCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.output, "rm: missing operand");
    }

    #[tokio::test]
    async fn test_rm_root_refused() {
        let mut env = TestEnv::new();
        let result = RmCommand.execute(env.ctx(vec!["-r", "/"])).await;
        assert!(!result.success);
        assert!(env.fs.exists("/home").await);
    }
}
