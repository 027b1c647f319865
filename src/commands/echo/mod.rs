// src/commands/echo/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct EchoCommand;

enum Redirect {
    Truncate(String),
    Append(String),
}

/// Process `echo -e` escape sequences. Returns the text and whether `\c`
/// cut it short.
fn process_escapes(input: &str) -> (String, bool) {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('e') => result.push('\x1b'),
            Some('c') => return (result, true),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    (result, false)
}

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn summary(&self) -> &'static str {
        "print text, optionally into a file with > or >>"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let args = &ctx.args;
        let mut interpret_escapes = false;
        let mut start_index = 0;

        while start_index < args.len() {
            match args[start_index].as_str() {
                "-n" => {}
                "-e" | "-ne" | "-en" => interpret_escapes = true,
                "-E" => interpret_escapes = false,
                _ => break,
            }
            start_index += 1;
        }

        let mut words: Vec<&str> = Vec::new();
        let mut redirect = None;
        let mut rest = args[start_index..].iter();
        while let Some(arg) = rest.next() {
            match arg.as_str() {
                op @ (">" | ">>") => {
                    let Some(file) = rest.next() else {
                        return CommandResult::error("syntax error near unexpected token `newline'");
                    };
                    redirect = Some(if op == ">" {
                        Redirect::Truncate(file.clone())
                    } else {
                        Redirect::Append(file.clone())
                    });
                }
                word => words.push(word),
            }
        }

        let mut text = words.join(" ");
        if interpret_escapes {
            text = process_escapes(&text).0;
        }

        let Some(redirect) = redirect else {
            return CommandResult::success(text);
        };
        match redirect {
            Redirect::Truncate(file) => {
                let path = match ctx.resolve(&file) {
                    Ok(p) => p,
                    Err(e) => return CommandResult::error(e.to_string()),
                };
                CommandResult::from_fs(ctx.fs.write_file(&path, &text).await)
            }
            Redirect::Append(file) => {
                let path = match ctx.resolve(&file) {
                    Ok(p) => p,
                    Err(e) => return CommandResult::error(e.to_string()),
                };
                // each appended echo starts on its own line
                let separate = matches!(
                    ctx.fs.read_file(&path).await,
                    Ok(existing) if !existing.is_empty() && !existing.ends_with('\n')
                );
                if separate {
                    text.insert(0, '\n');
                }
                CommandResult::from_fs(ctx.fs.append_file(&path, &text).await)
            }
        }
    }
}
