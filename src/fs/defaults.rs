//! Default layout seeded on first access and after `reset`.

use super::types::*;
use crate::utils::path::basename;

/// Values the seeded tree is parameterized by.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOptions {
    pub home_dir: String,
    pub username: String,
    pub hostname: String,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            home_dir: "/home/user".to_string(),
            username: "user".to_string(),
            hostname: "zk-terminal".to_string(),
        }
    }
}

/// Project directory mirrored into every fresh tree.
pub const PROJECT_DIR: &str = "/zk-terminal";

fn group_of(owner: &str) -> &'static str {
    if owner == "root" {
        "root"
    } else {
        "users"
    }
}

fn dir(path: &str, permissions: &str, owner: &str, children: Vec<FileSystemItem>) -> FileSystemItem {
    let mut d = Directory::new(&basename(path), path, owner, group_of(owner));
    d.meta.permissions = permissions.to_string();
    d.content = children;
    FileSystemItem::Directory(d)
}

fn file(path: &str, owner: &str, content: &str) -> FileSystemItem {
    FileSystemItem::File(File::new(&basename(path), path, content, owner, group_of(owner)))
}

fn device(path: &str) -> FileSystemItem {
    let mut f = File::new(&basename(path), path, "", "root", "root");
    f.meta.permissions = "crw-rw-rw-".to_string();
    FileSystemItem::File(f)
}

fn link(path: &str, owner: &str, target: &str) -> FileSystemItem {
    FileSystemItem::Symlink(Symlink::new(&basename(path), path, target, owner, group_of(owner)))
}

fn bashrc() -> String {
    format!(
        r#"# ~/.bashrc - user shell configuration

# Environment
export PATH="$HOME/bin:$PATH"
export EDITOR="nano"
export VISUAL="nano"
export PAGER="less"

# Aliases
alias ll='ls -l'
alias la='ls -la'
alias zk='cd {project}'

# Functions
mkcd() {{
    mkdir -p "$1" && cd "$1"
}}

echo "Welcome to zk-terminal!"
echo "Type 'help' for available commands."
"#,
        project = PROJECT_DIR
    )
}

const PROFILE: &str = r#"# ~/.profile - login environment

export PATH="/usr/local/bin:/usr/bin:/bin:$PATH"
export LANG="en_US.UTF-8"
export LC_ALL="en_US.UTF-8"
"#;

fn home_readme(opts: &SeedOptions) -> String {
    format!(
        "# Welcome to zk-terminal\n\n\
         A Unix-like shell running against a virtual, persisted filesystem.\n\n\
         ## Getting around\n\n\
         - `ls -l`, `cd`, `pwd`, `cat`, `find`, `grep`\n\
         - `mkdir`, `touch`, `cp`, `mv`, `rm -r`, `ln -s`, `chmod`\n\
         - `gzip`/`gunzip`, `tar -c -f`/`tar -x -f`\n\
         - `jobs`, `fg`, `kill`, `export`, `alias`, `history`\n\n\
         Chain commands with `;`, `&&` and `|`. Type `help` for the full list.\n\n\
         Home: {home}\nProject: {project} (also linked as ~/zk-terminal)\n",
        home = opts.home_dir,
        project = PROJECT_DIR
    )
}

const PROJECT_README: &str = "# zk-terminal\n\n\
A simulated Unix shell: a command-chain handler, a parser/dispatcher and a\n\
tree-shaped virtual filesystem persisted as a single blob.\n\n\
Run `zk-terminal` for an interactive prompt or `zk-terminal -c 'ls -l /'`\n\
for a one-shot command line.\n";

const PROJECT_MANIFEST: &str = "[package]\nname = \"zk-terminal\"\nversion = \"0.1.0\"\nedition = \"2021\"\n";

const PROJECT_MAIN: &str = "fn main() {\n    println!(\"zk-terminal\");\n}\n";

/// Build the seeded root directory.
pub fn default_root(opts: &SeedOptions) -> Directory {
    let home = opts.home_dir.trim_end_matches('/');
    let user = opts.username.as_str();
    let home_path = |rest: &str| format!("{}/{}", home, rest);

    let passwd = format!(
        "root:x:0:0:root:/root:/bin/bash\n{user}:x:1000:1000:{user}:{home}:/bin/bash\n",
        user = user,
        home = home
    );
    let group = format!("root:x:0:\nusers:x:100:\n{}:x:1000:\n", user);

    let home_dir = dir(
        home,
        DIRECTORY_PERMISSIONS,
        user,
        vec![
            file(&home_path(".bashrc"), user, &bashrc()),
            file(&home_path(".profile"), user, PROFILE),
            file(&home_path("README.md"), user, &home_readme(opts)),
            dir(&home_path("bin"), DIRECTORY_PERMISSIONS, user, vec![]),
            dir(&home_path("Documents"), DIRECTORY_PERMISSIONS, user, vec![]),
            dir(&home_path("Downloads"), DIRECTORY_PERMISSIONS, user, vec![]),
            dir(&home_path("Desktop"), DIRECTORY_PERMISSIONS, user, vec![]),
            link(&home_path("zk-terminal"), user, PROJECT_DIR),
        ],
    );

    // The home directory may sit anywhere; nest it under its ancestors.
    let mut home_tree = home_dir;
    let mut ancestor = crate::utils::path::parent_path(home);
    while ancestor != "/" {
        home_tree = dir(&ancestor, DIRECTORY_PERMISSIONS, "root", vec![home_tree]);
        ancestor = crate::utils::path::parent_path(&ancestor);
    }

    let mut root = Directory::new("/", "/", "root", "root");
    root.content = vec![
        dir("/bin", DIRECTORY_PERMISSIONS, "root", vec![]),
        dir("/sbin", DIRECTORY_PERMISSIONS, "root", vec![]),
        dir(
            "/usr",
            DIRECTORY_PERMISSIONS,
            "root",
            vec![
                dir("/usr/bin", DIRECTORY_PERMISSIONS, "root", vec![]),
                dir(
                    "/usr/local",
                    DIRECTORY_PERMISSIONS,
                    "root",
                    vec![
                        dir("/usr/local/bin", DIRECTORY_PERMISSIONS, "root", vec![]),
                        dir("/usr/local/lib", DIRECTORY_PERMISSIONS, "root", vec![]),
                    ],
                ),
                dir("/usr/share", DIRECTORY_PERMISSIONS, "root", vec![]),
            ],
        ),
        dir(
            "/etc",
            DIRECTORY_PERMISSIONS,
            "root",
            vec![
                file("/etc/passwd", "root", &passwd),
                file("/etc/group", "root", &group),
                file("/etc/hostname", "root", &format!("{}\n", opts.hostname)),
            ],
        ),
        dir(
            "/var",
            DIRECTORY_PERMISSIONS,
            "root",
            vec![
                dir("/var/log", DIRECTORY_PERMISSIONS, "root", vec![]),
                dir("/var/tmp", "drwxrwxrwt", "root", vec![]),
            ],
        ),
        dir("/tmp", "drwxrwxrwt", "root", vec![]),
        dir("/root", "drwx------", "root", vec![]),
        dir("/dev", DIRECTORY_PERMISSIONS, "root", vec![device("/dev/null"), device("/dev/zero")]),
        dir("/proc", "dr-xr-xr-x", "root", vec![]),
        dir("/sys", "dr-xr-xr-x", "root", vec![]),
        dir(
            PROJECT_DIR,
            DIRECTORY_PERMISSIONS,
            user,
            vec![
                file(&format!("{}/README.md", PROJECT_DIR), user, PROJECT_README),
                file(&format!("{}/Cargo.toml", PROJECT_DIR), user, PROJECT_MANIFEST),
                dir(
                    &format!("{}/src", PROJECT_DIR),
                    DIRECTORY_PERMISSIONS,
                    user,
                    vec![file(&format!("{}/src/main.rs", PROJECT_DIR), user, PROJECT_MAIN)],
                ),
            ],
        ),
    ];

    let after_tmp = root.position("tmp").map_or(root.content.len(), |i| i + 1);
    if root.child(home_tree.name()).is_some() {
        let mut wrapper = Directory::new("/", "/", "root", "root");
        wrapper.content.push(home_tree);
        if let Err(e) = super::tree::merge_into(&mut root, wrapper) {
            log::warn!("home directory {} clashes with the default layout: {}", home, e);
        }
    } else {
        root.content.insert(after_tmp, home_tree);
    }
    root
}

/// Names of the top-level entries of a freshly seeded tree.
pub fn default_top_level(opts: &SeedOptions) -> Vec<String> {
    default_root(opts)
        .content
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::tree;

    #[test]
    fn test_full_paths_are_consistent() {
        let root = default_root(&SeedOptions::default());
        tree::walk(&root, &mut |item| {
            let parent = crate::utils::path::parent_path(item.full_path());
            let parent_dir = tree::dir_at(&root, &parent).expect("parent exists");
            assert!(parent_dir.child(item.name()).is_some(), "{}", item.full_path());
        });
    }

    #[test]
    fn test_home_layout() {
        let root = default_root(&SeedOptions::default());
        let home = tree::dir_at(&root, "/home/user").unwrap();
        assert!(home.child(".bashrc").is_some());
        assert!(home.child("Documents").is_some());
        assert_eq!(
            tree::resolve(&root, "/home/user/zk-terminal", true).unwrap(),
            PROJECT_DIR
        );
    }

    #[test]
    fn test_custom_home() {
        let opts = SeedOptions {
            home_dir: "/users/alice".to_string(),
            username: "alice".to_string(),
            hostname: "box".to_string(),
        };
        let root = default_root(&opts);
        let home = tree::dir_at(&root, "/users/alice").unwrap();
        assert_eq!(home.meta.owner, "alice");
        assert!(default_top_level(&opts).contains(&"users".to_string()));
    }
}
