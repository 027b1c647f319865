//! Single-line parsing: alias and variable expansion, quote-aware
//! splitting on chain operators, and tokenisation into a command.

use crate::managers::{AliasManager, EnvManager};
use crate::utils::expand_tilde;

/// One whitespace-delimited word with its quotes removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    /// Any part of the word was quoted or escaped.
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// Handler name: the basename of the first word.
    pub name: String,
    pub args: Vec<String>,
    /// Trailing `&`.
    pub background: bool,
    /// The command text without the trailing `&`, as recorded for jobs.
    pub line: String,
}

/// Alias expansion (one level) followed by variable expansion.
pub fn expand_line(line: &str, aliases: &AliasManager, env: &EnvManager) -> String {
    expand_variables(&aliases.expand(line), env)
}

/// Expand `$NAME` / `${NAME}` everywhere except inside single quotes.
/// `\$` is kept for the tokenizer to unescape.
pub fn expand_variables(line: &str, env: &EnvManager) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending = String::new();
    let mut in_double = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                out.push_str(&env.expand_variables(&pending));
                pending.clear();
                out.push(c);
                for q in chars.by_ref() {
                    out.push(q);
                    if q == '\'' {
                        break;
                    }
                }
            }
            '\\' => match chars.next() {
                Some('$') => {
                    out.push_str(&env.expand_variables(&pending));
                    pending.clear();
                    out.push_str("\\$");
                }
                Some(next) => {
                    pending.push(c);
                    pending.push(next);
                }
                None => pending.push(c),
            },
            '"' => {
                in_double = !in_double;
                pending.push(c);
            }
            _ => pending.push(c),
        }
    }
    out.push_str(&env.expand_variables(&pending));
    out
}

/// Split `line` on `op` wherever it appears outside quotes. Parts are
/// trimmed and empty parts dropped.
pub fn split_top_level(line: &str, op: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
        } else if b == b'\\' && quote != Some('\'') {
            escaped = true;
        } else if let Some(q) = quote {
            if b == q as u8 {
                quote = None;
            }
        } else if b == b'\'' || b == b'"' {
            quote = Some(b as char);
        } else if bytes[i..].starts_with(op.as_bytes()) {
            parts.push(&line[start..i]);
            i += op.len();
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push(&line[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Quote-aware whitespace tokenizer.
pub fn tokenize(line: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' if matches!(chars.peek(), Some('"' | '\\' | '$')) => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    quoted = true;
                    in_word = true;
                }
                '\\' => {
                    in_word = true;
                    quoted = true;
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(Word { text: std::mem::take(&mut current), quoted });
                        in_word = false;
                        quoted = false;
                    }
                }
                _ => {
                    in_word = true;
                    current.push(c);
                }
            },
        }
    }
    if in_word {
        words.push(Word { text: current, quoted });
    }
    words
}

/// `/bin/bash` dispatches as `bash`.
fn command_name(word: &str) -> String {
    match word.rsplit('/').next() {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => word.to_string(),
    }
}

/// Parse an already-expanded single command. `None` for a blank line.
pub fn parse_command(line: &str, home: &str) -> Option<ParsedCommand> {
    let trimmed = line.trim();
    let (line, background) = match trimmed.strip_suffix('&') {
        Some(rest) if !rest.ends_with('\\') => (rest.trim_end(), true),
        _ => (trimmed, false),
    };

    let mut words = tokenize(line).into_iter();
    let first = words.next()?;
    let args = words
        .map(|w| if w.quoted { w.text } else { expand_tilde(&w.text, home) })
        .collect();

    Some(ParsedCommand {
        name: command_name(&first.text),
        args,
        background,
        line: line.to_string(),
    })
}
