//! zk-terminal - A simulated Unix shell over a persisted virtual filesystem
//!
//! This library provides the command interpreter of a browser-style
//! terminal: a tree-shaped filesystem behind a pluggable key-value store,
//! alias/environment/job registries, and a line handler that understands
//! `;`, `&&` and `|`.

pub mod commands;
pub mod config;
pub mod fs;
pub mod interpreter;
pub mod managers;
pub mod network;
pub mod shell;
pub mod utils;

pub use commands::{EditorKind, UiAction};
pub use config::{ConfigError, ShellConfig};
pub use interpreter::{ExecResult, ShellError};
pub use shell::{Shell, ShellOptions};
