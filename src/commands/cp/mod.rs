// src/commands/cp/mod.rs
use async_trait::async_trait;
use crate::commands::mv::{parse_transfer, target_for};
use crate::commands::{Command, CommandContext, CommandResult};

pub struct CpCommand;

#[async_trait]
impl Command for CpCommand {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn summary(&self) -> &'static str {
        "copy files and directories"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let transfer = match parse_transfer(&ctx, "cp") {
            Ok(t) => t,
            Err(e) => return CommandResult::error(e),
        };
        let many = transfer.sources.len() > 1;
        if many && ctx.fs.get_directory(&transfer.dest).await.is_err() {
            return CommandResult::error(format!("cp: target is not a directory: {}", transfer.dest));
        }

        let mut errors = Vec::new();
        for src in &transfer.sources {
            let outcome = match target_for(ctx.fs.as_ref(), src, &transfer.dest, many).await {
                Ok(target) => ctx.fs.copy_item(src, &target).await,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_cp_file() {
        let mut env = TestEnv::new();
        env.fs.write_file("/tmp/a", "A").await.unwrap();
        let result = CpCommand.execute(env.ctx(vec!["/tmp/a", "/tmp/b"])).await;
        assert!(result.success);
        assert_eq!(env.fs.read_file("/tmp/a").await.unwrap(), "A");
        assert_eq!(env.fs.read_file("/tmp/b").await.unwrap(), "A");
    }

    #[tokio::test]
    async fn test_cp_directory_recursive() {
        let mut env = TestEnv::new();
        env.fs.make_directory("/tmp/tree/deep", true).await.unwrap();
        env.fs.write_file("/tmp/tree/deep/leaf", "L").await.unwrap();
        let result = CpCommand.execute(env.ctx(vec!["-r", "/tmp/tree", "/tmp/copy"])).await;
        assert!(result.success, "{}", result.output);
        assert_eq!(env.fs.read_file("/tmp/copy/deep/leaf").await.unwrap(), "L");
        let item = env.fs.get_item("/tmp/copy/deep/leaf").await.unwrap();
        assert_eq!(item.full_path(), "/tmp/copy/deep/leaf");
    }

    #[tokio::test]
    async fn test_cp_type_mismatch() {
        let mut env = TestEnv::new();
        env.fs.make_directory("/tmp/dir", false).await.unwrap();
        env.fs.write_file("/tmp/file", "F").await.unwrap();
        let result = CpCommand.execute(env.ctx(vec!["/tmp/dir", "/tmp/file"])).await;
        assert_eq!(result.rendered(), "error: cannot overwrite file with directory: /tmp/file");
    }

    #[tokio::test]
    async fn test_cp_many_into_dir() {
        let mut env = TestEnv::new();
        env.fs.write_file("/tmp/x", "x").await.unwrap();
        env.fs.write_file("/tmp/y", "y").await.unwrap();
        env.fs.make_directory("/tmp/out", false).await.unwrap();
        let result = CpCommand.execute(env.ctx(vec!["/tmp/x", "/tmp/y", "/tmp/out"])).await;
        assert!(result.success);
        assert!(env.fs.exists("/tmp/out/x").await && env.fs.exists("/tmp/out/y").await);
        let result = CpCommand.execute(env.ctx(vec!["/tmp/x", "/tmp/y", "/tmp/nowhere"])).await;
        assert!(!result.success);
    }
}
