use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct HostnameCommand;
pub struct UnameCommand;

const KERNEL_NAME: &str = "Linux";
const KERNEL_RELEASE: &str = "6.1.0-zk";

fn hostname(ctx: &CommandContext<'_>) -> String {
    ctx.session
        .env
        .get("HOSTNAME")
        .map(str::to_string)
        .unwrap_or_else(|| ctx.config.hostname.clone())
}

#[async_trait]
impl Command for HostnameCommand {
    fn name(&self) -> &'static str {
        "hostname"
    }

    fn summary(&self) -> &'static str {
        "show the system host name"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::success(hostname(&ctx))
    }
}

#[async_trait]
impl Command for UnameCommand {
    fn name(&self) -> &'static str {
        "uname"
    }

    fn summary(&self) -> &'static str {
        "print system information"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let host = hostname(&ctx);
        let arch = std::env::consts::ARCH;
        let mut fields = Vec::new();
        for arg in &ctx.args {
            match arg.as_str() {
                "-a" | "--all" => {
                    return CommandResult::success(format!(
                        "{} {} {} #1 SMP {} GNU/Linux",
                        KERNEL_NAME, host, KERNEL_RELEASE, arch
                    ));
                }
                "-s" | "--kernel-name" => fields.push(KERNEL_NAME.to_string()),
                "-n" | "--nodename" => fields.push(host.clone()),
                "-r" | "--kernel-release" => fields.push(KERNEL_RELEASE.to_string()),
                "-m" | "--machine" => fields.push(arch.to_string()),
                other => return CommandResult::error(format!("uname: invalid option '{}'", other)),
            }
        }
        if fields.is_empty() {
            fields.push(KERNEL_NAME.to_string());
        }
        CommandResult::success(fields.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_hostname() {
        let mut env = TestEnv::new();
        let result = HostnameCommand.execute(env.ctx(vec![])).await;
        assert_eq!(result.output, "zk-terminal");
    }

    #[tokio::test]
    async fn test_uname() {
        let mut env = TestEnv::new();
        assert_eq!(UnameCommand.execute(env.ctx(vec![])).await.output, "Linux");
        assert_eq!(UnameCommand.execute(env.ctx(vec!["-s", "-n", "-r"])).await.output, "Linux zk-terminal 6.1.0-zk");
        let all = UnameCommand.execute(env.ctx(vec!["-a"])).await.output;
        assert!(all.starts_with("Linux zk-terminal 6.1.0-zk #1 SMP"));
        assert!(!UnameCommand.execute(env.ctx(vec!["-x"])).await.success);
    }
}
