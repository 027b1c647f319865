use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn summary(&self) -> &'static str {
        "display or clear the command history"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let history = &mut ctx.session.history;
        let count = match ctx.args.first().map(String::as_str) {
            Some("-c") => {
                history.clear();
                return CommandResult::empty();
            }
            Some(n) => match n.parse::<usize>() {
                Ok(n) => n,
                Err(_) => return CommandResult::error(format!("history: {}: numeric argument required", n)),
            },
            None => history.len(),
        };

        let skip = history.len().saturating_sub(count);
        let lines: Vec<String> = history
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(idx, line)| format!("{:>5}  {}", idx + 1, line))
            .collect();
        CommandResult::success(lines.join("\n"))
    }
}
