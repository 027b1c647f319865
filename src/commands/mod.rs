// src/commands/mod.rs
pub mod alias_cmd;
pub mod api_cmd;
pub mod bash_cmd;
pub mod cat;
pub mod cd_cmd;
pub mod chmod;
pub mod clear_cmd;
pub mod cp;
pub mod curl;
pub mod date;
pub mod echo;
pub mod editor_cmd;
pub mod env;
pub mod find;
pub mod grep;
pub mod gzip;
pub mod help_cmd;
pub mod history_cmd;
pub mod hostname_cmd;
pub mod jobs_cmd;
pub mod ln;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod pwd;
pub mod registry;
pub mod rm;
pub mod tar;
pub mod touch;
pub mod types;
pub mod wget_cmd;
pub mod which_cmd;
pub mod whoami_cmd;

#[cfg(test)]
pub(crate) mod test_support;

pub use registry::{create_default_registry, CommandRegistry};
pub use types::{Command, CommandContext, CommandResult, EditorKind, FetchFn, FetchResponse, Session, UiAction};
