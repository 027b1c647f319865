use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct WhoamiCommand;
pub struct IdCommand;
pub struct GroupsCommand;

const UID: u32 = 1000;
const USERS_GID: u32 = 100;

fn username(ctx: &CommandContext<'_>) -> String {
    ctx.session
        .env
        .get("USER")
        .map(str::to_string)
        .unwrap_or_else(|| ctx.config.username.clone())
}

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &'static str {
        "whoami"
    }

    fn summary(&self) -> &'static str {
        "print the current user name"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::success(username(&ctx))
    }
}

#[async_trait]
impl Command for IdCommand {
    fn name(&self) -> &'static str {
        "id"
    }

    fn summary(&self) -> &'static str {
        "print user and group ids"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let user = username(&ctx);
        let output = match ctx.args.first().map(String::as_str) {
            Some("-u") => UID.to_string(),
            Some("-g") => UID.to_string(),
            Some("-un") | Some("-nu") => user,
            _ => format!(
                "uid={uid}({user}) gid={uid}({user}) groups={uid}({user}),{gid}(users)",
                uid = UID,
                gid = USERS_GID,
                user = user
            ),
        };
        CommandResult::success(output)
    }
}

#[async_trait]
impl Command for GroupsCommand {
    fn name(&self) -> &'static str {
        "groups"
    }

    fn summary(&self) -> &'static str {
        "print group memberships"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::success(format!("{} users", username(&ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_identity_commands() {
        let mut env = TestEnv::new();
        assert_eq!(WhoamiCommand.execute(env.ctx(vec![])).await.output, "user");
        assert_eq!(
            IdCommand.execute(env.ctx(vec![])).await.output,
            "uid=1000(user) gid=1000(user) groups=1000(user),100(users)"
        );
        assert_eq!(IdCommand.execute(env.ctx(vec!["-u"])).await.output, "1000");
        assert_eq!(GroupsCommand.execute(env.ctx(vec![])).await.output, "user users");
    }

    #[tokio::test]
    async fn test_whoami_follows_user_variable() {
        let mut env = TestEnv::new();
        env.session.env.set("USER", "alice");
        assert_eq!(WhoamiCommand.execute(env.ctx(vec![])).await.output, "alice");
    }
}
