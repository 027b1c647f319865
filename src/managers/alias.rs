//! Alias registry.

use indexmap::IndexMap;

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("ll", "ls -l"),
    ("la", "ls -la"),
    ("l", "ls -CF"),
    ("ls", "ls --color=auto"),
    ("dir", "ls"),
    ("vdir", "ls -l"),
    ("..", "cd .."),
    ("...", "cd ../.."),
    ("....", "cd ../../.."),
    (".....", "cd ../../../.."),
    ("cp", "cp -i"),
    ("mv", "mv -i"),
    ("rm", "rm -i"),
    ("grep", "grep --color=auto"),
    ("fgrep", "fgrep --color=auto"),
    ("egrep", "egrep --color=auto"),
    ("h", "history"),
    ("j", "jobs -l"),
    ("p", "ps aux"),
    ("x", "exit"),
    ("vi", "vim"),
    ("emacs", "nano"),
    ("py", "python3"),
    ("python", "python3"),
    ("wget", "wget --no-check-certificate"),
    ("curl", "curl --silent"),
    ("cls", "clear"),
    ("c", "clear"),
    ("q", "exit"),
    ("bye", "exit"),
    ("logout", "exit"),
];

#[derive(Debug, Clone)]
pub struct AliasManager {
    aliases: IndexMap<String, String>,
}

impl AliasManager {
    /// Registry seeded with the default aliases.
    pub fn new() -> Self {
        let mut manager = Self::empty();
        for (name, command) in DEFAULT_ALIASES {
            manager.set(name, command);
        }
        manager
    }

    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, command: &str) {
        self.aliases.insert(name.to_string(), command.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.shift_remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.aliases.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Replace the leading word of `line` with its alias body, once.
    pub fn expand(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let (first, rest) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
            None => (trimmed, ""),
        };
        match self.get(first) {
            Some(body) if rest.is_empty() => body.to_string(),
            Some(body) => format!("{} {}", body, rest),
            None => line.to_string(),
        }
    }

    pub fn format_one(name: &str, command: &str) -> String {
        format!("alias {}='{}'", name, command)
    }

    /// `alias name='command'` lines.
    pub fn list(&self) -> String {
        if self.aliases.is_empty() {
            return "No aliases defined".to_string();
        }
        self.iter()
            .map(|(name, command)| Self::format_one(name, command))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for AliasManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let aliases = AliasManager::new();
        assert_eq!(aliases.get("ll"), Some("ls -l"));
        assert_eq!(aliases.get(".."), Some("cd .."));
        assert_eq!(aliases.get("mkdir"), None);
    }

    #[test]
    fn test_expand_one_level() {
        let aliases = AliasManager::new();
        assert_eq!(aliases.expand("ll /tmp"), "ls -l /tmp");
        // `ls` is itself an alias but the body is not expanded again.
        assert_eq!(aliases.expand("ll"), "ls -l");
        assert_eq!(aliases.expand("ls"), "ls --color=auto");
        assert_eq!(aliases.expand("pwd"), "pwd");
        assert_eq!(aliases.expand("echo ll"), "echo ll");
    }

    #[test]
    fn test_set_remove_list() {
        let mut aliases = AliasManager::empty();
        assert_eq!(aliases.list(), "No aliases defined");
        aliases.set("g", "grep -i");
        aliases.set("a", "alias");
        assert_eq!(aliases.list(), "alias g='grep -i'\nalias a='alias'");
        assert!(aliases.remove("g"));
        assert!(!aliases.remove("g"));
        assert_eq!(aliases.len(), 1);
    }
}
