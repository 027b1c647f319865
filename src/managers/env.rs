//! Environment variable registry. Names are case-normalized to uppercase.

use indexmap::IndexMap;

use crate::config::ShellConfig;

#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: IndexMap<String, String>,
}

impl EnvManager {
    pub fn empty() -> Self {
        Self { vars: IndexMap::new() }
    }

    /// Default Unix-like environment for `config`'s user.
    pub fn new(config: &ShellConfig) -> Self {
        let home = config.home_dir.as_str();
        let user = config.username.as_str();
        let mut env = Self::empty();
        let defaults: Vec<(&str, String)> = vec![
            ("HOME", home.to_string()),
            ("USER", user.to_string()),
            ("USERNAME", user.to_string()),
            ("LOGNAME", user.to_string()),
            ("SHELL", "/bin/bash".to_string()),
            ("PWD", config.initial_dir.clone()),
            ("OLDPWD", config.initial_dir.clone()),
            (
                "PATH",
                "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin".to_string(),
            ),
            ("LANG", "en_US.UTF-8".to_string()),
            ("LC_ALL", "en_US.UTF-8".to_string()),
            ("TERM", "xterm-256color".to_string()),
            ("TERM_PROGRAM", "zk-terminal".to_string()),
            ("COLUMNS", "80".to_string()),
            ("LINES", "24".to_string()),
            ("TMPDIR", "/tmp".to_string()),
            ("XDG_CONFIG_HOME", format!("{}/.config", home)),
            ("XDG_DATA_HOME", format!("{}/.local/share", home)),
            ("XDG_CACHE_HOME", format!("{}/.cache", home)),
            ("EDITOR", "nano".to_string()),
            ("VISUAL", "nano".to_string()),
            ("PAGER", "less".to_string()),
            ("HISTSIZE", config.history_size.to_string()),
            ("HISTCONTROL", "ignoredups".to_string()),
            ("TZ", "UTC".to_string()),
            ("HOSTNAME", config.hostname.clone()),
            ("HOSTTYPE", std::env::consts::ARCH.to_string()),
            ("OSTYPE", "zk-terminal".to_string()),
            ("PPID", "1".to_string()),
            ("UID", "1000".to_string()),
            ("EUID", "1000".to_string()),
            ("GROUPS", "1000".to_string()),
        ];
        for (name, value) in defaults {
            env.set(name, &value);
        }
        env
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_uppercase(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.shift_remove(&name.to_uppercase()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record a directory change in `PWD`/`OLDPWD`.
    pub fn update_pwd(&mut self, new_pwd: &str) {
        if let Some(old) = self.get("PWD").map(str::to_string) {
            self.set("OLDPWD", &old);
        }
        self.set("PWD", new_pwd);
    }

    /// Expand `$NAME` and `${NAME}`. Unknown variables are left verbatim.
    pub fn expand_variables(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(idx) = rest.find('$') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];
            let (name, consumed) = read_variable_name(after);
            match name.and_then(|n| self.get(n)) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[idx..idx + 1 + consumed]),
            }
            rest = &after[consumed..];
        }
        out.push_str(rest);
        out
    }
}

/// Name after a `$` and the number of bytes it spans, braces included.
fn read_variable_name(s: &str) -> (Option<&str>, usize) {
    if let Some(inner) = s.strip_prefix('{') {
        return match inner.find('}') {
            Some(end) if is_name(&inner[..end]) => (Some(&inner[..end]), end + 2),
            _ => (None, 0),
        };
    }
    let len = s
        .char_indices()
        .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
        .map_or(s.len(), |(i, _)| i);
    if len == 0 {
        (None, 0)
    } else {
        (Some(&s[..len]), len)
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> EnvManager {
        EnvManager::new(&ShellConfig::default())
    }

    #[test]
    fn test_case_normalization() {
        let mut env = env();
        env.set("editor", "vim");
        assert_eq!(env.get("EDITOR"), Some("vim"));
        assert_eq!(env.get("Editor"), Some("vim"));
        assert!(env.unset("eDiToR"));
        assert_eq!(env.get("EDITOR"), None);
    }

    #[test]
    fn test_expand_variables() {
        let env = env();
        assert_eq!(env.expand_variables("$HOME/docs"), "/home/user/docs");
        assert_eq!(env.expand_variables("${USER}x"), "userx");
        assert_eq!(env.expand_variables("$home"), "/home/user");
        assert_eq!(env.expand_variables("$NOPE and $"), "$NOPE and $");
        assert_eq!(env.expand_variables("cost $5"), "cost $5");
        assert_eq!(env.expand_variables("${unclosed"), "${unclosed");
    }

    #[test]
    fn test_update_pwd() {
        let mut env = env();
        env.update_pwd("/tmp");
        assert_eq!(env.get("PWD"), Some("/tmp"));
        assert_eq!(env.get("OLDPWD"), Some("/home/user"));
    }
}
