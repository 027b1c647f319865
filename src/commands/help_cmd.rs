use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct HelpCommand;

const OVERVIEW: &str = "Available command categories:
  help fileops     - File operations (ls, cd, pwd, etc.)
  help search      - Search and utility commands
  help shell       - Environment, aliases, scripts and jobs
  help network     - curl, wget and api
  help shortcuts   - Keyboard shortcuts
  help features    - Advanced features
  help all         - Show this overview

Use 'help <category>' for detailed information, or 'help <command>' for a summary.";

const FILEOPS: &str = "File Operations:
  ls [path] [--page N] [--page-size N] - List directory contents (with pagination)
  ls -l [path] [--page N] [--page-size N] - List directory contents with details
  cd [path|-]        - Change directory
  pwd                - Print working directory
  cat <file>         - Display file contents
  echo <text> [> file | >> file] - Print or write text
  touch <file>       - Create empty file
  mkdir [-p] <dir>   - Create directory
  rm [-r] <path>     - Remove file or directory
  mv <src> <dest>    - Move/rename file or directory
  cp [-r] <src> <dest> - Copy file or directory
  chmod <perm> <path> - Change file permissions
  ln [-s] <target> <link> - Create symbolic link";

const SEARCH: &str = "Search & Utilities:
  find <pattern> [type] [path] - Search for files
  grep <pattern> [path] [-i] - Search text in files
  gzip <file>        - Compress file
  gunzip <file>      - Decompress file
  tar -c -f <archive> <files...> - Create archive
  tar -x -f <archive> [dest] - Extract archive
  nano <file>        - Edit file with nano editor
  vim <file>         - Edit file with vim editor
  date [+FORMAT]     - Print the date
  clear              - Clear screen
  reset              - Reset filesystem (WARNING: deletes all data)
  help               - Show this help";

const SHELL: &str = "Shell:
  export NAME=value  - Set an environment variable
  env                - List environment variables
  unset NAME         - Remove a variable
  alias [name=value] - Define or list aliases
  unalias [-a] name  - Remove aliases
  source <file>      - Run a script in this shell
  bash [-c cmd | file] - Run a command string or script
  history [N|-c]     - Show or clear history
  jobs, bg, fg, kill, ps - Job control (append & to start a job)
  which, type        - Locate commands
  id, whoami, groups, hostname, uname - System information";

const NETWORK: &str = "Network:
  curl [-X METHOD] [-H header] [-d data] <url> - Transfer a URL
  wget [-P dir] <url> - Download a file
  wget -m [-np] [-n max] <url> - Mirror a site
  api <method> <url> [json] - Call a JSON API";

const SHORTCUTS: &str = "Keyboard shortcuts:
  Up/Down            - Navigate command history
  Tab                - Auto-complete commands and paths
  Ctrl+C             - Clear current input
  Ctrl+L             - Clear screen
  Ctrl+R             - Search command history
  Ctrl+D             - Exit terminal

Editor shortcuts:
  Nano: Ctrl+X save, Ctrl+C exit
  Vim:  Esc (insert to command), :q quit, :wq save+quit, :q! force quit";

const FEATURES: &str = "Advanced features:
  Command chaining with ; && |
  Variables ($NAME, ${NAME}) and aliases
  Shell functions and scripts via source
  Background jobs with &
  File compression and archiving
  Paged listings for large directories
  Cached, persistent virtual filesystem";

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn summary(&self) -> &'static str {
        "show help by category"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some(topic) = ctx.args.first().map(|a| a.to_lowercase()) else {
            return CommandResult::success(OVERVIEW);
        };
        let text = match topic.as_str() {
            "all" => OVERVIEW,
            "fileops" => FILEOPS,
            "search" => SEARCH,
            "shell" => SHELL,
            "network" => NETWORK,
            "shortcuts" => SHORTCUTS,
            "features" => FEATURES,
            name => {
                return match ctx.registry.get(name) {
                    Some(cmd) => CommandResult::success(format!("{} - {}", cmd.name(), cmd.summary())),
                    None => CommandResult::success(format!(
                        "Unknown category '{}'. Use 'help' for available categories.",
                        name
                    )),
                };
            }
        };
        CommandResult::success(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_help_categories() {
        let mut env = TestEnv::new();
        let result = HelpCommand.execute(env.ctx(vec![])).await;
        assert!(result.output.starts_with("Available command categories:"));
        let result = HelpCommand.execute(env.ctx(vec!["FileOps"])).await;
        assert!(result.output.starts_with("File Operations:"));
        let result = HelpCommand.execute(env.ctx(vec!["network"])).await;
        assert!(result.output.contains("wget -m"));
    }

    #[tokio::test]
    async fn test_help_command_and_unknown() {
        let mut env = TestEnv::new();
        let result = HelpCommand.execute(env.ctx(vec!["tar"])).await;
        assert_eq!(result.output, "tar - create or extract tar archives");
        let result = HelpCommand.execute(env.ctx(vec!["bogus"])).await;
        assert_eq!(result.output, "Unknown category 'bogus'. Use 'help' for available categories.");
    }
}
