// src/commands/date/mod.rs
use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

use crate::commands::{Command, CommandContext, CommandResult};

pub struct DateCommand;

const HELP: &str = "Usage: date [-u] [-I] [-R] [+FORMAT]\n\n\
Display the current time in the given FORMAT.\n\n\
Options:\n  -u         print UTC\n  -I         output in ISO 8601 format\n  -R         output in RFC 5322 format\n\n\
FORMAT controls the output. Common sequences:\n  %Y year  %m month  %d day  %H hour  %M minute  %S second\n  %F full date  %T full time  %a weekday  %b month name  %s timestamp\n";

const DEFAULT_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

fn valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Format `now` in UTC or local time.
pub(crate) fn render(now: DateTime<Utc>, utc: bool, format: &str) -> String {
    if utc {
        now.format(format).to_string()
    } else {
        now.with_timezone(&Local).format(format).to_string()
    }
}

#[async_trait]
impl Command for DateCommand {
    fn name(&self) -> &'static str {
        "date"
    }

    fn summary(&self) -> &'static str {
        "print the date and time"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut utc = false;
        let mut format = DEFAULT_FORMAT.to_string();
        for arg in &ctx.args {
            match arg.as_str() {
                "--help" => return CommandResult::success(HELP),
                "-u" | "--utc" | "--universal" => utc = true,
                "-I" | "--iso-8601" => format = "%Y-%m-%d".to_string(),
                "-R" | "--rfc-email" => format = "%a, %d %b %Y %H:%M:%S %z".to_string(),
                a if a.starts_with('+') => format = a[1..].to_string(),
                a => return CommandResult::error(format!("date: invalid option '{}'", a)),
            }
        }
        if !valid_format(&format) {
            return CommandResult::error(format!("date: invalid format '{}'", format));
        }
        CommandResult::success(render(Utc::now(), utc, &format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;
    use chrono::TimeZone;

    #[test]
    fn test_render_utc() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(render(at, true, DEFAULT_FORMAT), "Sat Mar  9 07:05:01 UTC 2024");
        assert_eq!(render(at, true, "%F %T"), "2024-03-09 07:05:01");
        assert_eq!(render(at, true, "%s"), "1709967901");
    }

    #[tokio::test]
    async fn test_date_format_arg() {
        let mut env = TestEnv::new();
        let result = DateCommand.execute(env.ctx(vec!["-u", "+%Y"])).await;
        assert!(result.success);
        assert_eq!(result.output.len(), 4);
        assert!(result.output.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_date_errors() {
        let mut env = TestEnv::new();
        let result = DateCommand.execute(env.ctx(vec!["+%Q"])).await;
        assert_eq!(result.rendered(), "error: date: invalid format '%Q'");
        let result = DateCommand.execute(env.ctx(vec!["-z"])).await;
        assert!(!result.success);
    }
}
