//! Errors raised before a command line reaches a handler.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShellError {
    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("too many commands, please wait a moment")]
    RateLimited,

    #[error("input too long ({len} characters, max {max})")]
    InputTooLong { len: usize, max: usize },

    #[error("empty command")]
    EmptyInput,

    #[error("maximum nesting depth ({max}) exceeded")]
    NestingTooDeep { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ShellError::CommandNotFound { command: "python3".to_string() };
        assert_eq!(err.to_string(), "command not found: python3");
        let err = ShellError::InputTooLong { len: 10_001, max: 10_000 };
        assert_eq!(err.to_string(), "input too long (10001 characters, max 10000)");
    }
}
