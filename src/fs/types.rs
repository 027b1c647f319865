//! File System Types
//!
//! Core node types, errors and the capability trait for the virtual file system.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File system errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FsError {
    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    #[error("cannot overwrite {existing} with {incoming}: {path}")]
    TypeMismatch {
        path: String,
        existing: ItemKind,
        incoming: ItemKind,
    },

    #[error("{kind} already exists: {path}")]
    AlreadyExists { path: String, kind: ItemKind },

    #[error("directory not empty: {path}. Use rm -r for recursive deletion.")]
    NotEmpty { path: String },

    #[error("path escapes the root directory: {path}")]
    PathTraversal { path: String },

    #[error("invalid path component: {component}")]
    InvalidPathComponent { component: String },

    #[error("invalid content: {reason}")]
    InvalidContent { reason: String },

    #[error("{reason}: {path}")]
    InvalidArgument { path: String, reason: String },

    #[error("too many levels of symbolic links: {path}")]
    SymlinkLoop { path: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl FsError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    pub fn invalid_argument(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Discriminant of a [`FileSystemItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Directory,
    File,
    Symlink,
}

impl ItemKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "directory" | "dir" | "d" => Some(Self::Directory),
            "file" | "f" => Some(Self::File),
            "symlink" | "link" | "l" => Some(Self::Symlink),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Symlink => "symlink",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes shared by every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl Metadata {
    pub fn new(permissions: &str, owner: &str, group: &str, size: u64) -> Self {
        let now = Utc::now();
        Self {
            permissions: permissions.to_string(),
            owner: owner.to_string(),
            group: group.to_string(),
            size,
            modified: now,
            created: now,
        }
    }

    /// Bump the modification time.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

pub const DIRECTORY_PERMISSIONS: &str = "drwxr-xr-x";
pub const FILE_PERMISSIONS: &str = "-rw-r--r--";
pub const SYMLINK_PERMISSIONS: &str = "lrwxrwxrwx";
pub const DIRECTORY_SIZE: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub name: String,
    pub full_path: String,
    /// Children in insertion order, which is also display order.
    #[serde(default)]
    pub content: Vec<FileSystemItem>,
    #[serde(flatten)]
    pub meta: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    pub full_path: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub meta: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symlink {
    pub name: String,
    pub full_path: String,
    pub target: String,
    #[serde(flatten)]
    pub meta: Metadata,
}

/// A node in the tree, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileSystemItem {
    Directory(Directory),
    File(File),
    Symlink(Symlink),
}

impl Directory {
    pub fn new(name: &str, full_path: &str, owner: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            content: Vec::new(),
            meta: Metadata::new(DIRECTORY_PERMISSIONS, owner, group, DIRECTORY_SIZE),
        }
    }

    pub fn child(&self, name: &str) -> Option<&FileSystemItem> {
        self.content.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FileSystemItem> {
        self.content.iter_mut().find(|c| c.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.content.iter().position(|c| c.name() == name)
    }

    pub fn remove_child(&mut self, name: &str) -> Option<FileSystemItem> {
        let idx = self.position(name)?;
        self.meta.touch();
        Some(self.content.remove(idx))
    }

    /// Insert a child, replacing any same-named sibling in place.
    pub fn put_child(&mut self, item: FileSystemItem) {
        self.meta.touch();
        match self.position(item.name()) {
            Some(idx) => self.content[idx] = item,
            None => self.content.push(item),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl File {
    pub fn new(name: &str, full_path: &str, content: &str, owner: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            content: content.to_string(),
            meta: Metadata::new(FILE_PERMISSIONS, owner, group, content.len() as u64),
        }
    }

    pub fn set_content(&mut self, content: String) {
        self.meta.size = content.len() as u64;
        self.meta.touch();
        self.content = content;
    }
}

impl Symlink {
    pub fn new(name: &str, full_path: &str, target: &str, owner: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            target: target.to_string(),
            meta: Metadata::new(SYMLINK_PERMISSIONS, owner, group, target.len() as u64),
        }
    }
}

impl FileSystemItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(d) => &d.name,
            Self::File(f) => &f.name,
            Self::Symlink(s) => &s.name,
        }
    }

    pub fn full_path(&self) -> &str {
        match self {
            Self::Directory(d) => &d.full_path,
            Self::File(f) => &f.full_path,
            Self::Symlink(s) => &s.full_path,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Directory(_) => ItemKind::Directory,
            Self::File(_) => ItemKind::File,
            Self::Symlink(_) => ItemKind::Symlink,
        }
    }

    pub fn meta(&self) -> &Metadata {
        match self {
            Self::Directory(d) => &d.meta,
            Self::File(f) => &f.meta,
            Self::Symlink(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Metadata {
        match self {
            Self::Directory(d) => &mut d.meta,
            Self::File(f) => &mut f.meta,
            Self::Symlink(s) => &mut s.meta,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        match self {
            Self::Directory(d) => d.name = name.to_string(),
            Self::File(f) => f.name = name.to_string(),
            Self::Symlink(s) => s.name = name.to_string(),
        }
    }

    /// Move the node to `full_path`, recomputing every descendant's path.
    pub fn relocate(&mut self, full_path: &str) {
        match self {
            Self::Directory(d) => {
                d.full_path = full_path.to_string();
                for child in d.content.iter_mut() {
                    let child_path = crate::utils::path::path_join(full_path, &[child.name()]);
                    child.relocate(&child_path);
                }
            }
            Self::File(f) => f.full_path = full_path.to_string(),
            Self::Symlink(s) => s.full_path = full_path.to_string(),
        }
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            name: self.name().to_string(),
            full_path: self.full_path().to_string(),
            kind: self.kind(),
            meta: self.meta().clone(),
            target: match self {
                Self::Symlink(s) => Some(s.target.clone()),
                _ => None,
            },
        }
    }
}

/// Flat description of a node, without children or file content.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub name: String,
    pub full_path: String,
    pub kind: ItemKind,
    pub meta: Metadata,
    pub target: Option<String>,
}

impl ItemSummary {
    /// `{permissions} {owner} {group} {size} {date}` prefix of a long listing line.
    pub fn long_prefix(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.meta.permissions,
            self.meta.owner,
            self.meta.group,
            self.meta.size,
            self.meta.modified.format("%Y-%m-%d")
        )
    }
}

/// 1-indexed page selection for directory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    /// `None` lists everything.
    pub page_size: Option<usize>,
}

impl PageRequest {
    pub fn all() -> Self {
        Self { page: 1, page_size: None }
    }

    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: Some(page_size.max(1)),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryListing {
    pub path: String,
    pub entries: Vec<ItemSummary>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub total: usize,
}

impl DirectoryListing {
    pub fn total_pages(&self) -> usize {
        match self.page_size {
            Some(size) if self.total > 0 => self.total.div_ceil(size.max(1)),
            _ => 1,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.page_size, Some(size) if self.total > size)
    }

    /// The "more items" notice and page summary, present only when the
    /// listing does not fit on a single page.
    pub fn footer(&self, command: &str) -> Option<String> {
        let size = self.page_size?;
        if !self.is_truncated() {
            return None;
        }
        let shown_until = self.page.saturating_mul(size).min(self.total);
        let mut out = String::new();
        if shown_until < self.total {
            out.push_str(&format!(
                "... and {} more items. Use '{} --page {}' to see next page.\n",
                self.total - shown_until,
                command,
                self.page.saturating_add(1)
            ));
        }
        out.push_str(&format!(
            "Page {} of {} ({} total items)",
            self.page,
            self.total_pages(),
            self.total
        ));
        Some(out)
    }
}

/// One matching line from [`FileSystem::grep_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    pub file: String,
    /// 1-indexed.
    pub line: usize,
    pub content: String,
}

/// Capability interface handed to command handlers.
///
/// Every path argument is absolute; callers resolve relative paths against
/// their working directory first.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Directory at `path`, following symlinks.
    async fn get_directory(&self, path: &str) -> Result<Directory, FsError>;

    /// Node at `path` without following a final symlink.
    async fn get_item(&self, path: &str) -> Result<FileSystemItem, FsError>;

    async fn exists(&self, path: &str) -> bool;

    /// Physical path with all symlinks resolved.
    async fn realpath(&self, path: &str) -> Result<String, FsError>;

    async fn list_directory(&self, path: &str, page: PageRequest) -> Result<DirectoryListing, FsError>;

    /// Create a directory. With `parents`, missing ancestors are created and
    /// an existing directory is not an error.
    async fn make_directory(&self, path: &str, parents: bool) -> Result<(), FsError>;

    async fn create_file(&self, path: &str, content: &str) -> Result<(), FsError>;

    async fn read_file(&self, path: &str) -> Result<String, FsError>;

    /// Validated write, creating the file if absent.
    async fn write_file(&self, path: &str, content: &str) -> Result<(), FsError>;

    /// Unvalidated write for trusted download paths.
    async fn write_file_unsafe(&self, path: &str, content: &str) -> Result<(), FsError>;

    async fn append_file(&self, path: &str, content: &str) -> Result<(), FsError>;

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), FsError>;

    async fn move_item(&self, src: &str, dest: &str) -> Result<(), FsError>;

    async fn copy_item(&self, src: &str, dest: &str) -> Result<(), FsError>;

    async fn change_permissions(&self, path: &str, permissions: &str) -> Result<(), FsError>;

    async fn create_symlink(&self, target: &str, link_path: &str) -> Result<(), FsError>;

    async fn find_files(
        &self,
        start: &str,
        pattern: &str,
        kind: Option<ItemKind>,
    ) -> Result<Vec<ItemSummary>, FsError>;

    async fn grep_search(
        &self,
        start: &str,
        pattern: &str,
        case_sensitive: bool,
    ) -> Result<Vec<GrepMatch>, FsError>;

    /// Gzip a file in place, renaming it to `<name>.gz`. Returns the new path.
    async fn compress_file(&self, path: &str) -> Result<String, FsError>;

    /// Reverse of [`FileSystem::compress_file`]. Returns the restored path.
    async fn decompress_file(&self, path: &str) -> Result<String, FsError>;

    /// Pack `sources` into a tar archive at `archive`, naming members
    /// relative to `base_dir`. Returns the number of members written.
    async fn create_archive(&self, archive: &str, sources: &[String], base_dir: &str) -> Result<usize, FsError>;

    /// Unpack `archive` below `dest`. Returns the extracted paths.
    async fn extract_archive(&self, archive: &str, dest: &str) -> Result<Vec<String>, FsError>;

    /// Restore the seeded default tree.
    async fn reset(&self) -> Result<(), FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_from_str() {
        assert_eq!(ItemKind::from_str("file"), Some(ItemKind::File));
        assert_eq!(ItemKind::from_str("d"), Some(ItemKind::Directory));
        assert_eq!(ItemKind::from_str("Symlink"), Some(ItemKind::Symlink));
        assert_eq!(ItemKind::from_str("socket"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let file = FileSystemItem::File(File::new("a.txt", "/a.txt", "hi", "user", "users"));
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["fullPath"], "/a.txt");
        assert_eq!(json["size"], 2);
        assert!(json["modified"].is_string());
    }

    #[test]
    fn test_dates_revived_on_load() {
        let raw = r#"{
            "type": "symlink", "name": "l", "fullPath": "/l", "target": "/x",
            "permissions": "lrwxrwxrwx", "owner": "user", "group": "users", "size": 2,
            "modified": "2024-03-01T10:00:00.000Z", "created": "2024-03-01T10:00:00.000Z"
        }"#;
        let item: FileSystemItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.kind(), ItemKind::Symlink);
        assert_eq!(item.meta().modified.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_relocate_updates_descendants() {
        let mut root = Directory::new("a", "/a", "user", "users");
        let mut inner = Directory::new("b", "/a/b", "user", "users");
        inner.content.push(FileSystemItem::File(File::new("f", "/a/b/f", "", "user", "users")));
        root.content.push(FileSystemItem::Directory(inner));

        let mut item = FileSystemItem::Directory(root);
        item.relocate("/x/y");

        let FileSystemItem::Directory(moved) = item else { panic!("expected directory") };
        let FileSystemItem::Directory(b) = &moved.content[0] else { panic!("expected directory") };
        assert_eq!(b.full_path, "/x/y/b");
        assert_eq!(b.content[0].full_path(), "/x/y/b/f");
    }

    #[test]
    fn test_listing_footer() {
        let listing = DirectoryListing {
            path: "/".to_string(),
            entries: Vec::new(),
            page: 1,
            page_size: Some(20),
            total: 45,
        };
        let footer = listing.footer("ls -l").unwrap();
        assert!(footer.contains("... and 25 more items. Use 'ls -l --page 2' to see next page."));
        assert!(footer.ends_with("Page 1 of 3 (45 total items)"));

        let last = DirectoryListing { page: 3, ..listing.clone() };
        assert_eq!(last.footer("ls -l").unwrap(), "Page 3 of 3 (45 total items)");

        let small = DirectoryListing { total: 5, ..listing };
        assert!(small.footer("ls -l").is_none());
    }

    #[test]
    fn test_error_messages() {
        let err = FsError::AlreadyExists { path: "/tmp".to_string(), kind: ItemKind::Directory };
        assert_eq!(err.to_string(), "directory already exists: /tmp");
        let err = FsError::TypeMismatch {
            path: "/x".to_string(),
            existing: ItemKind::Directory,
            incoming: ItemKind::File,
        };
        assert_eq!(err.to_string(), "cannot overwrite directory with file: /x");
    }
}
