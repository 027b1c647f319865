//! Tree-backed filesystem.
//!
//! Every operation loads the whole tree from the store, resolves its
//! path(s), mutates the owned copy, and saves the whole tree back. A failed
//! operation never saves, so partial edits are discarded with the copy.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex_lite::Regex;
use tokio::sync::Mutex;

use super::archive::{self, ArchiveMember};
use super::store::VfsStore;
use super::tree;
use super::types::*;
use crate::utils::path::{components, is_within, normalize_path, path_join};

pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

lazy_static! {
    static ref BLOCKED_CONTENT: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)<script\b").unwrap(), "script tags are not allowed"),
        (Regex::new(r"(?i)javascript:").unwrap(), "javascript: URLs are not allowed"),
        (
            Regex::new(r"(?i)<[a-z][^>]*\son[a-z]+\s*=").unwrap(),
            "inline event handlers are not allowed"
        ),
    ];
}

pub struct TreeFs {
    store: Arc<dyn VfsStore>,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
    owner: String,
    group: String,
    max_file_size: usize,
}

impl TreeFs {
    pub fn new(store: Arc<dyn VfsStore>, owner: &str) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            owner: owner.to_string(),
            group: "users".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max: usize) -> Self {
        self.max_file_size = max;
        self
    }

    fn validate_content(&self, content: &str) -> Result<(), FsError> {
        if content.len() > self.max_file_size {
            return Err(FsError::InvalidContent {
                reason: format!("content exceeds {} bytes", self.max_file_size),
            });
        }
        for (pattern, reason) in BLOCKED_CONTENT.iter() {
            if pattern.is_match(content) {
                return Err(FsError::InvalidContent { reason: reason.to_string() });
            }
        }
        Ok(())
    }

    /// Run `op` against a freshly loaded tree and persist it on success.
    async fn mutate<T, F>(&self, op: F) -> Result<T, FsError>
    where
        F: FnOnce(&mut Directory) -> Result<T, FsError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut root = self.store.load().await;
        let out = op(&mut root)?;
        self.store.save(&root).await?;
        Ok(out)
    }

    fn new_dir(&self, parent: &str, name: &str) -> FileSystemItem {
        FileSystemItem::Directory(Directory::new(
            name,
            &path_join(parent, &[name]),
            &self.owner,
            &self.group,
        ))
    }

    fn new_file(&self, parent: &str, name: &str, content: &str) -> FileSystemItem {
        FileSystemItem::File(File::new(
            name,
            &path_join(parent, &[name]),
            content,
            &self.owner,
            &self.group,
        ))
    }

    /// Write to `path`, following a final symlink and creating the file
    /// under its parent when absent.
    fn write_in(&self, root: &mut Directory, path: &str, content: String) -> Result<(), FsError> {
        let target = match tree::resolve(root, path, true) {
            Ok(physical) => physical,
            Err(FsError::NotFound { .. }) => {
                let (parent, name) = tree::resolve_parent(root, path)?;
                if let Some(FileSystemItem::Symlink(link)) = tree::dir_at(root, &parent).and_then(|d| d.child(&name)) {
                    // Dangling link: create the file where it points.
                    let dest = normalize_path(&resolve_link_target(&parent, &link.target))?;
                    return self.write_in(root, &dest, content);
                }
                let file = self.new_file(&parent, &name, &content);
                let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
                dir.put_child(file);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        match tree::item_at_mut(root, &target) {
            Some(FileSystemItem::File(f)) => {
                f.set_content(content);
                Ok(())
            }
            Some(_) | None => Err(FsError::IsADirectory { path: path.to_string() }),
        }
    }

    /// Place `item` at `dest` following move/copy overwrite rules.
    fn place(root: &mut Directory, mut item: FileSystemItem, dest: &str) -> Result<(), FsError> {
        let existing = tree::resolve(root, dest, false).ok();
        match existing {
            Some(physical) => {
                let existing_kind = tree::item_at(root, &physical)
                    .map(|i| i.kind())
                    .unwrap_or(ItemKind::Directory);
                if existing_kind != item.kind() {
                    return Err(FsError::TypeMismatch {
                        path: dest.to_string(),
                        existing: existing_kind,
                        incoming: item.kind(),
                    });
                }
                match item {
                    FileSystemItem::Directory(incoming) => {
                        let target = tree::dir_at_mut(root, &physical)
                            .ok_or_else(|| FsError::not_a_directory(dest))?;
                        tree::merge_into(target, incoming)
                    }
                    _ => {
                        let (parent, name) = split_physical(&physical);
                        item.set_name(&name);
                        item.relocate(&physical);
                        let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_found(dest))?;
                        dir.put_child(item);
                        Ok(())
                    }
                }
            }
            None => {
                let (parent, name) = tree::resolve_parent(root, dest)?;
                item.set_name(&name);
                item.relocate(&path_join(&parent, &[&name]));
                let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(dest))?;
                dir.put_child(item);
                Ok(())
            }
        }
    }

    fn destination_inside(root: &Directory, src_physical: &str, dest: &str) -> bool {
        let dest_physical = tree::resolve(root, dest, true)
            .or_else(|_| tree::resolve_parent(root, dest).map(|(p, n)| path_join(&p, &[&n])));
        match dest_physical {
            Ok(p) => p != src_physical && is_within(&p, src_physical),
            Err(_) => false,
        }
    }

    fn collect_members(&self, item: &FileSystemItem, rel: &str, out: &mut Vec<ArchiveMember>) {
        let meta = item.meta();
        let mut member = ArchiveMember {
            path: rel.to_string(),
            kind: item.kind(),
            mode: archive::mode_from_permissions(&meta.permissions),
            mtime: meta.modified.timestamp(),
            content: Vec::new(),
            link_target: String::new(),
        };
        match item {
            FileSystemItem::File(f) => {
                member.content = f.content.as_bytes().to_vec();
                out.push(member);
            }
            FileSystemItem::Symlink(s) => {
                member.link_target = s.target.clone();
                out.push(member);
            }
            FileSystemItem::Directory(d) => {
                out.push(member);
                for child in &d.content {
                    self.collect_members(child, &format!("{}/{}", rel, child.name()), out);
                }
            }
        }
    }
}

fn split_physical(physical: &str) -> (String, String) {
    let mut parts = components(physical);
    let name = parts.pop().unwrap_or_default();
    (format!("/{}", parts.join("/")), name)
}

fn resolve_link_target(parent: &str, target: &str) -> String {
    if target.starts_with('/') {
        target.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), target)
    }
}

fn not_root(path: &str) -> Result<(), FsError> {
    if path == "/" {
        return Err(FsError::invalid_argument("/", "operation not permitted on the root directory"));
    }
    Ok(())
}

#[async_trait]
impl FileSystem for TreeFs {
    async fn get_directory(&self, path: &str) -> Result<Directory, FsError> {
        let path = normalize_path(path)?;
        let root = self.store.load().await;
        let physical = tree::resolve(&root, &path, true)?;
        tree::dir_at(&root, &physical)
            .cloned()
            .ok_or_else(|| FsError::not_a_directory(&path))
    }

    async fn get_item(&self, path: &str) -> Result<FileSystemItem, FsError> {
        let path = normalize_path(path)?;
        let root = self.store.load().await;
        if path == "/" {
            return Ok(FileSystemItem::Directory(root));
        }
        let physical = tree::resolve(&root, &path, false)?;
        tree::item_at(&root, &physical)
            .cloned()
            .ok_or_else(|| FsError::not_found(&path))
    }

    async fn exists(&self, path: &str) -> bool {
        let Ok(path) = normalize_path(path) else { return false };
        let root = self.store.load().await;
        tree::resolve(&root, &path, false).is_ok()
    }

    async fn realpath(&self, path: &str) -> Result<String, FsError> {
        let path = normalize_path(path)?;
        let root = self.store.load().await;
        tree::resolve(&root, &path, true)
    }

    async fn list_directory(&self, path: &str, page: PageRequest) -> Result<DirectoryListing, FsError> {
        let dir = self.get_directory(path).await?;
        let total = dir.content.len();
        let entries: Vec<ItemSummary> = match page.page_size {
            Some(size) => dir
                .content
                .iter()
                .skip((page.page.max(1) - 1).saturating_mul(size))
                .take(size)
                .map(|c| c.summary())
                .collect(),
            None => dir.content.iter().map(|c| c.summary()).collect(),
        };
        Ok(DirectoryListing {
            path: dir.full_path,
            entries,
            page: page.page.max(1),
            page_size: page.page_size,
            total,
        })
    }

    async fn make_directory(&self, path: &str, parents: bool) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| {
            if path == "/" {
                return if parents {
                    Ok(())
                } else {
                    Err(FsError::AlreadyExists { path: path.clone(), kind: ItemKind::Directory })
                };
            }
            if !parents {
                let (parent, name) = tree::resolve_parent(root, &path)?;
                let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
                if let Some(existing) = dir.child(&name) {
                    return Err(FsError::AlreadyExists { path: path.clone(), kind: existing.kind() });
                }
                dir.put_child(self.new_dir(&parent, &name));
                return Ok(());
            }

            let parts = components(&path);
            for i in 1..=parts.len() {
                let prefix = format!("/{}", parts[..i].join("/"));
                match tree::resolve(root, &prefix, true) {
                    Ok(physical) => {
                        if tree::dir_at(root, &physical).is_none() {
                            return Err(if i == parts.len() {
                                FsError::AlreadyExists { path: path.clone(), kind: ItemKind::File }
                            } else {
                                FsError::not_a_directory(&prefix)
                            });
                        }
                    }
                    Err(FsError::NotFound { .. }) => {
                        let (parent, name) = tree::resolve_parent(root, &prefix)?;
                        let created = self.new_dir(&parent, &name);
                        let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
                        dir.put_child(created);
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        })
        .await
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        self.validate_content(content)?;
        self.mutate(|root| {
            let (parent, name) = tree::resolve_parent(root, &path)?;
            let file = self.new_file(&parent, &name, content);
            let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
            if let Some(existing) = dir.child(&name) {
                return Err(FsError::AlreadyExists { path: path.clone(), kind: existing.kind() });
            }
            dir.put_child(file);
            Ok(())
        })
        .await
    }

    async fn read_file(&self, path: &str) -> Result<String, FsError> {
        let path = normalize_path(path)?;
        let root = self.store.load().await;
        let physical = tree::resolve(&root, &path, true)?;
        match tree::item_at(&root, &physical) {
            Some(FileSystemItem::File(f)) => Ok(f.content.clone()),
            Some(_) => Err(FsError::IsADirectory { path }),
            None if physical == "/" => Err(FsError::IsADirectory { path }),
            None => Err(FsError::not_found(path)),
        }
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<(), FsError> {
        self.validate_content(content)?;
        self.write_file_unsafe(path, content).await
    }

    async fn write_file_unsafe(&self, path: &str, content: &str) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| self.write_in(root, &path, content.to_string())).await
    }

    async fn append_file(&self, path: &str, content: &str) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| {
            let existing = match tree::resolve(root, &path, true) {
                Ok(physical) => match tree::item_at(root, &physical) {
                    Some(FileSystemItem::File(f)) => f.content.clone(),
                    _ => return Err(FsError::IsADirectory { path: path.clone() }),
                },
                Err(FsError::NotFound { .. }) => String::new(),
                Err(e) => return Err(e),
            };
            let combined = existing + content;
            self.validate_content(&combined)?;
            self.write_in(root, &path, combined)
        })
        .await
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        not_root(&path)?;
        self.mutate(|root| {
            let physical = tree::resolve(root, &path, false)?;
            not_root(&physical)?;
            if let Some(FileSystemItem::Directory(d)) = tree::item_at(root, &physical) {
                if !d.is_empty() && !recursive {
                    return Err(FsError::NotEmpty { path: path.clone() });
                }
            }
            let (parent, name) = split_physical(&physical);
            tree::dir_at_mut(root, &parent)
                .and_then(|d| d.remove_child(&name))
                .map(|_| ())
                .ok_or_else(|| FsError::not_found(&path))
        })
        .await
    }

    async fn move_item(&self, src: &str, dest: &str) -> Result<(), FsError> {
        let src = normalize_path(src)?;
        let dest = normalize_path(dest)?;
        not_root(&src)?;
        self.mutate(|root| {
            let src_physical = tree::resolve(root, &src, false)?;
            not_root(&src_physical)?;
            if tree::resolve(root, &dest, false).ok().as_deref() == Some(src_physical.as_str()) {
                return Ok(());
            }
            if Self::destination_inside(root, &src_physical, &dest) {
                return Err(FsError::invalid_argument(&dest, "cannot move a directory into itself"));
            }
            let (parent, name) = split_physical(&src_physical);
            let item = tree::dir_at_mut(root, &parent)
                .and_then(|d| d.remove_child(&name))
                .ok_or_else(|| FsError::not_found(&src))?;
            Self::place(root, item, &dest)
        })
        .await
    }

    async fn copy_item(&self, src: &str, dest: &str) -> Result<(), FsError> {
        let src = normalize_path(src)?;
        let dest = normalize_path(dest)?;
        self.mutate(|root| {
            let src_physical = tree::resolve(root, &src, true)?;
            let mut item = if src_physical == "/" {
                FileSystemItem::Directory(root.clone())
            } else {
                tree::item_at(root, &src_physical)
                    .cloned()
                    .ok_or_else(|| FsError::not_found(&src))?
            };
            if item.kind() == ItemKind::Directory && Self::destination_inside(root, &src_physical, &dest) {
                return Err(FsError::invalid_argument(&dest, "cannot copy a directory into itself"));
            }
            let now = chrono::Utc::now();
            item.meta_mut().created = now;
            item.meta_mut().modified = now;
            Self::place(root, item, &dest)
        })
        .await
    }

    async fn change_permissions(&self, path: &str, permissions: &str) -> Result<(), FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| {
            let physical = tree::resolve(root, &path, true)?;
            let meta = if physical == "/" {
                &mut root.meta
            } else {
                tree::item_at_mut(root, &physical)
                    .map(|i| i.meta_mut())
                    .ok_or_else(|| FsError::not_found(&path))?
            };
            meta.permissions = permissions.to_string();
            meta.touch();
            Ok(())
        })
        .await
    }

    async fn create_symlink(&self, target: &str, link_path: &str) -> Result<(), FsError> {
        let link_path = normalize_path(link_path)?;
        self.mutate(|root| {
            let (parent, name) = tree::resolve_parent(root, &link_path)?;
            let full_path = path_join(&parent, &[&name]);
            let link = Symlink::new(&name, &full_path, target, &self.owner, &self.group);
            let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
            if let Some(existing) = dir.child(&name) {
                return Err(FsError::AlreadyExists { path: link_path.clone(), kind: existing.kind() });
            }
            dir.put_child(FileSystemItem::Symlink(link));
            Ok(())
        })
        .await
    }

    async fn find_files(
        &self,
        start: &str,
        pattern: &str,
        kind: Option<ItemKind>,
    ) -> Result<Vec<ItemSummary>, FsError> {
        let dir = self.get_directory(start).await?;
        let glob = if pattern.contains(['*', '?', '[']) && pattern != "*" {
            glob::Pattern::new(pattern).ok()
        } else {
            None
        };
        // glob syntax widens the match; the literal text still matches as a substring
        let matches_name = |name: &str| {
            pattern == "*" || name.contains(pattern) || glob.as_ref().is_some_and(|g| g.matches(name))
        };

        let mut found = Vec::new();
        tree::walk(&dir, &mut |item| {
            if kind.map_or(true, |k| k == item.kind()) && matches_name(item.name()) {
                found.push(item.summary());
            }
        });
        Ok(found)
    }

    async fn grep_search(
        &self,
        start: &str,
        pattern: &str,
        case_sensitive: bool,
    ) -> Result<Vec<GrepMatch>, FsError> {
        let start = normalize_path(start)?;
        let root = self.store.load().await;
        let physical = tree::resolve(&root, &start, true)?;
        let needle = if case_sensitive { pattern.to_string() } else { pattern.to_lowercase() };

        let mut matches = Vec::new();
        let mut scan = |item: &FileSystemItem| {
            if let FileSystemItem::File(f) = item {
                for (idx, line) in f.content.lines().enumerate() {
                    let hay = if case_sensitive { line.to_string() } else { line.to_lowercase() };
                    if hay.contains(&needle) {
                        matches.push(GrepMatch {
                            file: f.full_path.clone(),
                            line: idx + 1,
                            content: line.to_string(),
                        });
                    }
                }
            }
        };
        match tree::dir_at(&root, &physical) {
            Some(dir) => tree::walk(dir, &mut scan),
            None => {
                let item = tree::item_at(&root, &physical).ok_or_else(|| FsError::not_found(&start))?;
                scan(item);
            }
        }
        Ok(matches)
    }

    async fn compress_file(&self, path: &str) -> Result<String, FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| {
            let physical = tree::resolve(root, &path, true)?;
            let Some(FileSystemItem::File(file)) = tree::item_at(root, &physical).cloned() else {
                return Err(FsError::IsADirectory { path: path.clone() });
            };
            if file.name.ends_with(".gz") {
                return Err(FsError::invalid_argument(&path, "file is already compressed"));
            }
            let compressed = archive::to_text(&archive::gzip(file.content.as_bytes())?);
            let (parent, name) = split_physical(&physical);
            let new_name = format!("{}.gz", name);
            let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_found(&path))?;
            if dir.child(&new_name).is_some() {
                return Err(FsError::AlreadyExists {
                    path: path_join(&parent, &[&new_name]),
                    kind: ItemKind::File,
                });
            }
            let mut packed = file;
            packed.set_content(compressed);
            packed.name = new_name.clone();
            packed.full_path = path_join(&parent, &[&new_name]);
            let new_path = packed.full_path.clone();
            match dir.position(&name) {
                Some(idx) => dir.content[idx] = FileSystemItem::File(packed),
                None => dir.content.push(FileSystemItem::File(packed)),
            }
            Ok(new_path)
        })
        .await
    }

    async fn decompress_file(&self, path: &str) -> Result<String, FsError> {
        let path = normalize_path(path)?;
        self.mutate(|root| {
            let physical = tree::resolve(root, &path, true)?;
            let Some(FileSystemItem::File(file)) = tree::item_at(root, &physical).cloned() else {
                return Err(FsError::IsADirectory { path: path.clone() });
            };
            let Some(stem) = file.name.strip_suffix(".gz").filter(|s| !s.is_empty()) else {
                return Err(FsError::invalid_argument(&path, "file is not compressed"));
            };
            let bytes = archive::gunzip(&archive::from_text(&file.content)?)?;
            let text = String::from_utf8(bytes).map_err(|_| FsError::InvalidContent {
                reason: "binary content is not supported".to_string(),
            })?;
            let (parent, name) = split_physical(&physical);
            let stem = stem.to_string();
            let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_found(&path))?;
            if dir.child(&stem).is_some() {
                return Err(FsError::AlreadyExists {
                    path: path_join(&parent, &[&stem]),
                    kind: ItemKind::File,
                });
            }
            let mut plain = file;
            plain.set_content(text);
            plain.full_path = path_join(&parent, &[&stem]);
            plain.name = stem;
            let new_path = plain.full_path.clone();
            match dir.position(&name) {
                Some(idx) => dir.content[idx] = FileSystemItem::File(plain),
                None => dir.content.push(FileSystemItem::File(plain)),
            }
            Ok(new_path)
        })
        .await
    }

    async fn create_archive(&self, archive_path: &str, sources: &[String], base_dir: &str) -> Result<usize, FsError> {
        let archive_path = normalize_path(archive_path)?;
        let base_dir = normalize_path(base_dir)?;
        let mut members = Vec::new();
        {
            let root = self.store.load().await;
            for source in sources {
                let source = normalize_path(source)?;
                let physical = tree::resolve(&root, &source, false)?;
                let item = if physical == "/" {
                    FileSystemItem::Directory(root.clone())
                } else {
                    tree::item_at(&root, &physical)
                        .cloned()
                        .ok_or_else(|| FsError::not_found(&source))?
                };
                let rel = match source.strip_prefix(&format!("{}/", base_dir.trim_end_matches('/'))) {
                    Some(rel) => rel.to_string(),
                    None => source.trim_start_matches('/').to_string(),
                };
                self.collect_members(&item, &rel, &mut members);
            }
        }
        members.retain(|m| !m.path.is_empty());
        let mut bytes = archive::pack(&members)?;
        if archive_path.ends_with(".gz") || archive_path.ends_with(".tgz") {
            bytes = archive::gzip(&bytes)?;
        }
        self.write_file_unsafe(&archive_path, &archive::to_text(&bytes)).await?;
        Ok(members.len())
    }

    async fn extract_archive(&self, archive_path: &str, dest: &str) -> Result<Vec<String>, FsError> {
        let encoded = self.read_file(archive_path).await?;
        let mut bytes = archive::from_text(&encoded)?;
        if archive::is_gzip(&bytes) {
            bytes = archive::gunzip(&bytes)?;
        }
        let members = archive::unpack(&bytes)?;
        let dest = normalize_path(dest)?;

        self.mutate(|root| {
            let mut extracted = Vec::new();
            for member in members {
                let target = normalize_path(&path_join(&dest, &[&member.path]))?;
                if !is_within(&target, &dest) || target == dest {
                    continue;
                }
                let permissions = archive::permissions_from_mode(member.kind, member.mode);
                let parent_dir = crate::utils::path::parent_path(&target);
                ensure_dirs(root, &parent_dir, &self.owner, &self.group)?;
                match member.kind {
                    ItemKind::Directory => ensure_dirs(root, &target, &self.owner, &self.group)?,
                    ItemKind::File => {
                        let text = String::from_utf8(member.content).map_err(|_| FsError::InvalidContent {
                            reason: format!("binary member not supported: {}", member.path),
                        })?;
                        self.write_in(root, &target, text)?;
                    }
                    ItemKind::Symlink => {
                        let (parent, name) = tree::resolve_parent(root, &target)?;
                        let link = Symlink::new(&name, &target, &member.link_target, &self.owner, &self.group);
                        let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
                        if dir.child(&name).is_none() {
                            dir.put_child(FileSystemItem::Symlink(link));
                        }
                    }
                }
                if let Ok(physical) = tree::resolve(root, &target, false) {
                    if let Some(item) = tree::item_at_mut(root, &physical) {
                        if item.kind() == member.kind {
                            item.meta_mut().permissions = permissions;
                        }
                    }
                }
                extracted.push(target);
            }
            Ok(extracted)
        })
        .await
    }

    async fn reset(&self) -> Result<(), FsError> {
        let _guard = self.write_lock.lock().await;
        self.store.reset().await?;
        Ok(())
    }
}

/// `mkdir -p` over an already loaded tree.
fn ensure_dirs(root: &mut Directory, path: &str, owner: &str, group: &str) -> Result<(), FsError> {
    let parts = components(path);
    for i in 1..=parts.len() {
        let prefix = format!("/{}", parts[..i].join("/"));
        match tree::resolve(root, &prefix, true) {
            Ok(physical) if tree::dir_at(root, &physical).is_some() => {}
            Ok(_) => {
                return Err(FsError::TypeMismatch {
                    path: prefix,
                    existing: ItemKind::File,
                    incoming: ItemKind::Directory,
                })
            }
            Err(FsError::NotFound { .. }) => {
                let (parent, name) = tree::resolve_parent(root, &prefix)?;
                let dir = tree::dir_at_mut(root, &parent).ok_or_else(|| FsError::not_a_directory(&parent))?;
                dir.put_child(FileSystemItem::Directory(Directory::new(
                    &name,
                    &path_join(&parent, &[&name]),
                    owner,
                    group,
                )));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
