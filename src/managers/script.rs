//! Line-oriented script reader used by `source`, `bash <file>` and `.bashrc`.
//!
//! Only a small subset of shell grammar is understood: `NAME=value`
//! assignments, `name() { ... }` function definitions, and plain command
//! lines. `if ... fi`, `for ... done` and `while ... done` blocks are skipped.

use lazy_static::lazy_static;
use regex_lite::Regex;

lazy_static! {
    static ref ASSIGNMENT: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").unwrap();
    static ref FUNCTION_HEAD: Regex =
        Regex::new(r"^(?:function\s+)?([A-Za-z_][A-Za-z0-9_-]*)\s*\(\)\s*\{(.*)$").unwrap();
}

/// A user-defined function body.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFunction {
    pub name: String,
    pub body: Vec<String>,
}

impl ScriptFunction {
    /// Body lines with positional parameters substituted.
    pub fn invoke(&self, args: &[String]) -> Vec<String> {
        self.body.iter().map(|line| substitute_positional(line, args)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Assign { name: String, value: String },
    Define(ScriptFunction),
    Run(String),
}

pub struct ScriptRunner;

impl ScriptRunner {
    pub fn parse(content: &str) -> Vec<ScriptStep> {
        let mut steps = Vec::new();
        let mut lines = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        while let Some(line) = lines.next() {
            if let Some(caps) = FUNCTION_HEAD.captures(line) {
                let name = caps[1].to_string();
                let mut body = Vec::new();
                let rest = caps[2].trim();
                if let Some(inline) = rest.strip_suffix('}') {
                    // one-line form: name() { cmd; }
                    push_body(&mut body, inline);
                } else {
                    push_body(&mut body, rest);
                    for inner in lines.by_ref() {
                        if inner == "}" {
                            break;
                        }
                        match inner.strip_suffix('}') {
                            Some(last) if inner.ends_with(";}") || inner.ends_with("; }") => {
                                push_body(&mut body, last);
                                break;
                            }
                            _ => push_body(&mut body, inner),
                        }
                    }
                }
                steps.push(ScriptStep::Define(ScriptFunction { name, body }));
                continue;
            }

            if let Some(terminator) = block_terminator(line) {
                skip_block(&mut lines, line, terminator);
                continue;
            }

            if let Some(caps) = ASSIGNMENT.captures(line) {
                steps.push(ScriptStep::Assign {
                    name: caps[1].to_string(),
                    value: unquote(&caps[2]).to_string(),
                });
                continue;
            }

            steps.push(ScriptStep::Run(line.to_string()));
        }
        steps
    }
}

fn push_body(body: &mut Vec<String>, line: &str) {
    let line = line.trim().trim_end_matches(';').trim();
    if !line.is_empty() {
        body.push(line.to_string());
    }
}

fn first_word(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

fn block_terminator(line: &str) -> Option<&'static str> {
    match first_word(line) {
        "if" => Some("fi"),
        "for" | "while" | "until" => Some("done"),
        _ => None,
    }
}

/// Consume lines up to and including the terminator matching `head`.
fn skip_block<'a>(lines: &mut impl Iterator<Item = &'a str>, head: &str, terminator: &str) {
    if closes_inline(head, terminator) {
        return;
    }
    let mut depth = 1usize;
    for line in lines {
        let word = first_word(line);
        if block_terminator(line) == Some(terminator) {
            if !closes_inline(line, terminator) {
                depth += 1;
            }
        } else if word == terminator || closes_inline(line, terminator) {
            depth -= 1;
            if depth == 0 {
                return;
            }
        }
    }
}

fn closes_inline(line: &str, terminator: &str) -> bool {
    line.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .last()
        == Some(terminator)
        && first_word(line) != terminator
}

/// Strip surrounding whitespace and one layer of matching quotes.
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Replace `$1`..`$9`, `$@`, `$*` and `$#`.
pub fn substitute_positional(line: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(d @ '1'..='9') => {
                chars.next();
                let idx = d as usize - '1' as usize;
                if let Some(arg) = args.get(idx) {
                    out.push_str(arg);
                }
            }
            Some('@') | Some('*') => {
                chars.next();
                out.push_str(&args.join(" "));
            }
            Some('#') => {
                chars.next();
                out.push_str(&args.len().to_string());
            }
            _ => out.push('$'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let steps = ScriptRunner::parse(
            "# comment\n\nNAME=\"world\"\necho hello $NAME\n  export EDITOR=vim  \n",
        );
        assert_eq!(
            steps,
            vec![
                ScriptStep::Assign {
                    name: "NAME".into(),
                    value: "world".into()
                },
                ScriptStep::Run("echo hello $NAME".into()),
                ScriptStep::Run("export EDITOR=vim".into()),
            ]
        );
    }

    #[test]
    fn test_parse_function() {
        let steps = ScriptRunner::parse("mkcd() {\n    mkdir -p \"$1\" && cd \"$1\"\n}\ngreet() { echo hi $1; }\nmkcd x");
        assert_eq!(steps.len(), 3);
        match &steps[0] {
            ScriptStep::Define(f) => {
                assert_eq!(f.name, "mkcd");
                assert_eq!(f.body, vec!["mkdir -p \"$1\" && cd \"$1\""]);
            }
            other => panic!("unexpected step: {:?}", other),
        }
        match &steps[1] {
            ScriptStep::Define(f) => assert_eq!(f.invoke(&["bob".into()]), vec!["echo hi bob"]),
            other => panic!("unexpected step: {:?}", other),
        }
        assert_eq!(steps[2], ScriptStep::Run("mkcd x".into()));
    }

    #[test]
    fn test_skips_blocks() {
        let script = "if [ -f x ]; then\n  echo a\n  if true; then echo b; fi\nfi\nfor i in 1 2; do\n echo $i\ndone\nwhile true; do echo x; done\necho after";
        assert_eq!(ScriptRunner::parse(script), vec![ScriptStep::Run("echo after".into())]);
    }

    #[test]
    fn test_substitute_positional() {
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(substitute_positional("$1-$2-$3", &args), "a-b-");
        assert_eq!(substitute_positional("all: $@ ($#)", &args), "all: a b (2)");
        assert_eq!(substitute_positional("$HOME $", &args), "$HOME $");
    }
}
