use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct CdCommand;

#[async_trait]
impl Command for CdCommand {
    fn name(&self) -> &'static str { "cd" }

    fn summary(&self) -> &'static str { "change the working directory" }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let target = ctx.args.iter().find(|a| !a.starts_with('-') || a.as_str() == "-").cloned();

        let (target, announce) = match target.as_deref() {
            None => (ctx.session.home().to_string(), false),
            Some("-") => match ctx.session.env.get("OLDPWD") {
                Some(old) => (old.to_string(), true),
                None => return CommandResult::error("cd: OLDPWD not set"),
            },
            Some(t) => (t.to_string(), false),
        };

        let path = match ctx.resolve(&target) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(e.to_string()),
        };
        if let Err(e) = ctx.fs.get_directory(&path).await {
            return CommandResult::error(e.to_string());
        }

        log::debug!("cd {} -> {}", ctx.session.cwd, path);
        ctx.set_current_dir(&path);
        if announce {
            CommandResult::success(path)
        } else {
            CommandResult::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_cd_relative_and_parent() {
        let mut env = TestEnv::new();
        let result = CdCommand.execute(env.ctx(vec!["Documents"])).await;
        assert!(result.success);
        assert_eq!(env.session.cwd, "/home/user/Documents");
        CdCommand.execute(env.ctx(vec![".."])).await;
        assert_eq!(env.session.cwd, "/home/user");
    }

    #[tokio::test]
    async fn test_cd_home_and_dash() {
        let mut env = TestEnv::new();
        CdCommand.execute(env.ctx(vec!["/tmp"])).await;
        CdCommand.execute(env.ctx(vec![])).await;
        assert_eq!(env.session.cwd, "/home/user");
        let result = CdCommand.execute(env.ctx(vec!["-"])).await;
        assert_eq!(result.output, "/tmp");
        assert_eq!(env.session.cwd, "/tmp");
        assert_eq!(env.session.env.get("OLDPWD"), Some("/home/user"));
    }

    #[tokio::test]
    async fn test_cd_through_symlink() {
        let mut env = TestEnv::new();
        let result = CdCommand.execute(env.ctx(vec!["~/zk-terminal/src"])).await;
        assert!(result.success, "{}", result.output);
        assert_eq!(env.session.cwd, "/home/user/zk-terminal/src");
    }

    #[tokio::test]
    async fn test_cd_errors() {
        let mut env = TestEnv::new();
        let result = CdCommand.execute(env.ctx(vec!["missing"])).await;
        assert_eq!(result.rendered(), "error: no such file or directory: /home/user/missing");
        let result = CdCommand.execute(env.ctx(vec!["/etc/passwd"])).await;
        assert!(!result.success);
        let result = CdCommand.execute(env.ctx(vec!["/../.."])).await;
        assert!(!result.success);
        assert_eq!(env.session.cwd, "/home/user");
    }
}
