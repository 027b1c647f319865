//! Interpreter module
//!
//! Turns a raw input line into handler calls:
//! - `parser`: alias/variable expansion, operator splitting, tokenising
//! - `dispatcher`: function and handler lookup
//! - `chain`: `;` / `&&` / `|` sequencing, rate limiting, delegation

pub mod chain;
pub mod dispatcher;
pub mod errors;
pub mod parser;
pub mod rate_limit;

pub use chain::{sanitize, ChainHandler, ExecResult};
pub use dispatcher::Dispatcher;
pub use errors::ShellError;
pub use parser::{parse_command, split_top_level, tokenize, ParsedCommand};
pub use rate_limit::RateLimiter;
