//! Path Utilities
//!
//! Pure string functions over `/`-separated absolute paths. Nothing here
//! touches the tree.

use crate::fs::FsError;

/// Join path segments into an absolute path.
///
/// Leading and trailing separators are stripped from every segment and empty
/// segments are dropped, so `path_join("/home/", &["/user/"])` is `/home/user`.
pub fn path_join(base: &str, parts: &[&str]) -> String {
    let segments: Vec<&str> = std::iter::once(base)
        .chain(parts.iter().copied())
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Normalize a path, collapsing `.` and `..`.
///
/// Fails with `PathTraversal` when `..` would climb above the root, and with
/// `InvalidPathComponent` for segments carrying a backslash, a NUL byte, or an
/// embedded `..`.
pub fn normalize_path(path: &str) -> Result<String, FsError> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(FsError::PathTraversal { path: path.to_string() });
                }
            }
            s if s.contains("..") || s.contains('\\') || s.contains('\0') => {
                return Err(FsError::InvalidPathComponent { component: s.to_string() });
            }
            s => stack.push(s),
        }
    }
    Ok(format!("/{}", stack.join("/")))
}

/// Parent of `path`; the root is its own parent.
pub fn parent_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() <= 1 {
        return "/".to_string();
    }
    format!("/{}", parts[..parts.len() - 1].join("/"))
}

/// Last segment of `path`; the root's basename is `/`.
pub fn basename(path: &str) -> String {
    path.split('/')
        .filter(|p| !p.is_empty())
        .last()
        .unwrap_or("/")
        .to_string()
}

/// Resolve `target` against `current_dir`.
pub fn resolve_path(current_dir: &str, target: &str) -> Result<String, FsError> {
    if target.starts_with('/') {
        return normalize_path(target);
    }
    match target {
        "" | "." => Ok(current_dir.to_string()),
        ".." => Ok(parent_path(current_dir)),
        _ => normalize_path(&path_join(current_dir, &[target])),
    }
}

/// Replace a leading `~` with `home`.
pub fn expand_tilde(path: &str, home: &str) -> String {
    if path == "~" {
        return home.to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) => path_join(home, &[rest]),
        None => path.to_string(),
    }
}

/// Inverse of [`expand_tilde`] for prompts and listings.
pub fn to_display_path(path: &str, home: &str) -> String {
    if path == home {
        return "~".to_string();
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.starts_with('/') && home != "/" => format!("~{}", rest),
        _ => path.to_string(),
    }
}

/// Split a normalized absolute path into its segments.
pub fn components(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Whether `path` is `ancestor` or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == "/" {
        return true;
    }
    path == ancestor || path.starts_with(&format!("{}/", ancestor))
}
