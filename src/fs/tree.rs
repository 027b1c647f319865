//! Tree walking helpers.
//!
//! Pure functions over an owned root [`Directory`]. Paths handed in are
//! already normalized; symlinks are resolved here, never eagerly stored.

use super::types::*;
use crate::utils::path::{components, path_join};

const MAX_SYMLINK_HOPS: usize = 40;

/// Directory at a physical (symlink-free) path.
pub fn dir_at<'a>(root: &'a Directory, physical: &str) -> Option<&'a Directory> {
    let mut current = root;
    for part in components(physical) {
        match current.child(&part)? {
            FileSystemItem::Directory(d) => current = d,
            _ => return None,
        }
    }
    Some(current)
}

pub fn dir_at_mut<'a>(root: &'a mut Directory, physical: &str) -> Option<&'a mut Directory> {
    let mut current = root;
    for part in components(physical) {
        match current.child_mut(&part)? {
            FileSystemItem::Directory(d) => current = d,
            _ => return None,
        }
    }
    Some(current)
}

/// Node at a physical path. `None` for the root, which is not an item.
pub fn item_at<'a>(root: &'a Directory, physical: &str) -> Option<&'a FileSystemItem> {
    let mut parts = components(physical);
    let name = parts.pop()?;
    let parent = dir_at(root, &join(&parts))?;
    parent.child(&name)
}

pub fn item_at_mut<'a>(root: &'a mut Directory, physical: &str) -> Option<&'a mut FileSystemItem> {
    let mut parts = components(physical);
    let name = parts.pop()?;
    let parent = dir_at_mut(root, &join(&parts))?;
    parent.child_mut(&name)
}

/// Resolve `path` to its physical location.
///
/// Symlinks on intermediate components are always followed; the final
/// component is followed only when `follow_last` is set. Every component
/// must exist.
pub fn resolve(root: &Directory, path: &str, follow_last: bool) -> Result<String, FsError> {
    let mut pending: Vec<String> = components(path);
    pending.reverse();
    let mut resolved: Vec<String> = Vec::new();
    let mut hops = 0;

    while let Some(part) = pending.pop() {
        match part.as_str() {
            "." => continue,
            ".." => {
                resolved.pop();
                continue;
            }
            _ => {}
        }
        let is_last = pending.is_empty();
        let parent = dir_at(root, &join(&resolved)).ok_or_else(|| FsError::not_a_directory(path))?;
        let child = parent.child(&part).ok_or_else(|| FsError::not_found(path))?;

        match child {
            FileSystemItem::Symlink(link) if !is_last || follow_last => {
                hops += 1;
                if hops > MAX_SYMLINK_HOPS {
                    return Err(FsError::SymlinkLoop { path: path.to_string() });
                }
                if link.target.starts_with('/') {
                    resolved.clear();
                }
                let mut target = components(&link.target);
                target.reverse();
                pending.extend(target);
            }
            FileSystemItem::File(_) if !is_last => {
                return Err(FsError::not_a_directory(path));
            }
            _ => resolved.push(part),
        }
    }

    Ok(join(&resolved))
}

/// Resolve everything but the final component of `path`, which must name a
/// child of an existing directory. Returns the physical parent and the name.
pub fn resolve_parent(root: &Directory, path: &str) -> Result<(String, String), FsError> {
    let mut parts = components(path);
    let name = parts
        .pop()
        .ok_or_else(|| FsError::invalid_argument("/", "operation not permitted on the root directory"))?;
    let parent = resolve(root, &join(&parts), true)?;
    if dir_at(root, &parent).is_none() {
        return Err(FsError::not_a_directory(join(&parts)));
    }
    Ok((parent, name))
}

/// Depth-first pre-order visit of every descendant of `dir`.
pub fn walk<'a>(dir: &'a Directory, visit: &mut dyn FnMut(&'a FileSystemItem)) {
    for child in &dir.content {
        visit(child);
        if let FileSystemItem::Directory(d) = child {
            walk(d, visit);
        }
    }
}

/// Merge `incoming` into `dest`: same-named files and symlinks are replaced,
/// same-named directories are merged, and a kind clash fails.
pub fn merge_into(dest: &mut Directory, incoming: Directory) -> Result<(), FsError> {
    for child in incoming.content {
        let child_path = path_join(&dest.full_path, &[child.name()]);
        let existing_kind = dest.child(child.name()).map(|c| c.kind());
        match (existing_kind, child) {
            (Some(kind), child) if kind != child.kind() => {
                return Err(FsError::TypeMismatch {
                    path: child_path,
                    existing: kind,
                    incoming: child.kind(),
                });
            }
            (Some(ItemKind::Directory), FileSystemItem::Directory(sub)) => {
                if let Some(FileSystemItem::Directory(target)) = dest.child_mut(&sub.name) {
                    merge_into(target, sub)?;
                }
            }
            (_, mut child) => {
                child.relocate(&child_path);
                dest.put_child(child);
            }
        }
    }
    dest.meta.touch();
    Ok(())
}

fn join(parts: &[String]) -> String {
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        let mut root = Directory::new("/", "/", "root", "root");
        let mut home = Directory::new("home", "/home", "root", "root");
        let mut user = Directory::new("user", "/home/user", "user", "users");
        user.content.push(FileSystemItem::File(File::new(
            "notes.txt",
            "/home/user/notes.txt",
            "hello",
            "user",
            "users",
        )));
        home.content.push(FileSystemItem::Directory(user));
        root.content.push(FileSystemItem::Directory(home));
        root.content.push(FileSystemItem::Symlink(Symlink::new("u", "/u", "/home/user", "root", "root")));
        root.content.push(FileSystemItem::Symlink(Symlink::new("rel", "/rel", "home", "root", "root")));
        root.content.push(FileSystemItem::Symlink(Symlink::new("loop", "/loop", "/loop", "root", "root")));
        root
    }

    #[test]
    fn test_resolve_plain() {
        let root = sample();
        assert_eq!(resolve(&root, "/home/user/notes.txt", true).unwrap(), "/home/user/notes.txt");
        assert_eq!(resolve(&root, "/", true).unwrap(), "/");
    }

    #[test]
    fn test_resolve_through_symlinks() {
        let root = sample();
        assert_eq!(resolve(&root, "/u/notes.txt", true).unwrap(), "/home/user/notes.txt");
        assert_eq!(resolve(&root, "/u", true).unwrap(), "/home/user");
        assert_eq!(resolve(&root, "/u", false).unwrap(), "/u");
        assert_eq!(resolve(&root, "/rel/user", true).unwrap(), "/home/user");
    }

    #[test]
    fn test_resolve_errors() {
        let root = sample();
        assert!(matches!(resolve(&root, "/nope", true), Err(FsError::NotFound { .. })));
        assert!(matches!(
            resolve(&root, "/home/user/notes.txt/x", true),
            Err(FsError::NotADirectory { .. })
        ));
        assert!(matches!(resolve(&root, "/loop", true), Err(FsError::SymlinkLoop { .. })));
    }

    #[test]
    fn test_resolve_parent() {
        let root = sample();
        let (parent, name) = resolve_parent(&root, "/u/new.txt").unwrap();
        assert_eq!(parent, "/home/user");
        assert_eq!(name, "new.txt");
        assert!(resolve_parent(&root, "/").is_err());
        assert!(matches!(
            resolve_parent(&root, "/home/user/notes.txt/x"),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_walk_order() {
        let root = sample();
        let mut seen = Vec::new();
        walk(&root, &mut |item| seen.push(item.full_path().to_string()));
        assert_eq!(seen[0], "/home");
        assert_eq!(seen[1], "/home/user");
        assert_eq!(seen[2], "/home/user/notes.txt");
    }

    #[test]
    fn test_merge_into() {
        let mut dest = Directory::new("d", "/d", "user", "users");
        dest.content.push(FileSystemItem::File(File::new("a", "/d/a", "old", "user", "users")));
        dest.content.push(FileSystemItem::File(File::new("keep", "/d/keep", "k", "user", "users")));

        let mut src = Directory::new("s", "/s", "user", "users");
        src.content.push(FileSystemItem::File(File::new("a", "/s/a", "new", "user", "users")));
        src.content.push(FileSystemItem::File(File::new("b", "/s/b", "b", "user", "users")));

        merge_into(&mut dest, src).unwrap();
        let names: Vec<&str> = dest.content.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "keep", "b"]);
        let FileSystemItem::File(a) = &dest.content[0] else { panic!("expected file") };
        assert_eq!(a.content, "new");
        assert_eq!(a.full_path, "/d/a");
    }

    #[test]
    fn test_merge_kind_clash() {
        let mut dest = Directory::new("d", "/d", "user", "users");
        dest.content.push(FileSystemItem::Directory(Directory::new("x", "/d/x", "user", "users")));
        let mut src = Directory::new("s", "/s", "user", "users");
        src.content.push(FileSystemItem::File(File::new("x", "/s/x", "", "user", "users")));
        assert!(matches!(merge_into(&mut dest, src), Err(FsError::TypeMismatch { .. })));
    }
}
