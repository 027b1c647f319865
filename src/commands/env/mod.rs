// src/commands/env/mod.rs
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::managers::unquote;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

pub struct ExportCommand;
pub struct EnvCommand;
pub struct UnsetCommand;

fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

#[async_trait]
impl Command for ExportCommand {
    fn name(&self) -> &'static str {
        "export"
    }

    fn summary(&self) -> &'static str {
        "set environment variables"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let env = &mut ctx.session.env;
        let assignments: Vec<&String> = ctx.args.iter().filter(|a| a.as_str() != "-p").collect();
        if assignments.is_empty() {
            let lines: Vec<String> = env
                .iter()
                .map(|(name, value)| format!("declare -x {}=\"{}\"", name, value))
                .collect();
            return CommandResult::success(lines.join("\n"));
        }

        let mut errors = Vec::new();
        for arg in assignments {
            let (name, value) = match arg.split_once('=') {
                Some((name, value)) => (name, Some(unquote(value))),
                None => (arg.as_str(), None),
            };
            if !is_identifier(name) {
                errors.push(format!("export: `{}': not a valid identifier", arg));
                continue;
            }
            match value {
                Some(value) => env.set(name, value),
                None if env.get(name).is_none() => env.set(name, ""),
                None => {}
            }
        }
        if errors.is_empty() {
            CommandResult::empty()
        } else {
            CommandResult::error(errors.join("\n"))
        }
    }
}

#[async_trait]
impl Command for EnvCommand {
    fn name(&self) -> &'static str {
        "env"
    }

    fn summary(&self) -> &'static str {
        "print the environment"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let lines: Vec<String> = ctx
            .session
            .env
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        CommandResult::success(lines.join("\n"))
    }
}

#[async_trait]
impl Command for UnsetCommand {
    fn name(&self) -> &'static str {
        "unset"
    }

    fn summary(&self) -> &'static str {
        "remove environment variables"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let names: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-')).collect();
        if names.is_empty() {
            return CommandResult::error("unset: usage: unset NAME [NAME ...]");
        }
        for name in names {
            // unknown names are not an error
            ctx.session.env.unset(name);
            ctx.session.functions.remove(name.as_str());
        }
        CommandResult::empty()
    }
}
