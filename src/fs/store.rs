//! Virtual Filesystem Store
//!
//! The whole tree lives in one serialized blob under a single key of a
//! pluggable key-value backend. Every mutation reloads the blob, edits the
//! tree and writes the blob back.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::defaults::{default_root, SeedOptions};
use super::types::{Directory, FileSystemItem, FsError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode filesystem: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<StorageError> for FsError {
    fn from(e: StorageError) -> Self {
        FsError::Storage { message: e.to_string() }
    }
}

/// Key-value persistence backend.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local backend, used by tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

/// One file per key below a state directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.blob", safe))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.key_path(key)).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.key_path(key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Load/save/reset contract for the root directory.
#[async_trait]
pub trait VfsStore: Send + Sync {
    /// Root directory, seeded with defaults when absent or unreadable.
    async fn load(&self) -> Directory;
    async fn save(&self, root: &Directory) -> Result<(), StorageError>;
    /// Drop the persisted tree and return the seeded defaults.
    async fn reset(&self) -> Result<Directory, StorageError>;
}

/// [`VfsStore`] over a [`StorageBackend`], persisting base64-encoded JSON.
pub struct BackendStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    seed: SeedOptions,
}

impl BackendStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: &str, seed: SeedOptions) -> Self {
        Self {
            backend,
            key: key.to_string(),
            seed,
        }
    }

    fn encode(root: &Directory) -> Result<String, StorageError> {
        let json = serde_json::to_string(&FileSystemItem::Directory(root.clone()))?;
        Ok(BASE64.encode(json.as_bytes()))
    }

    /// Base64 blobs are preferred; raw JSON is accepted as well.
    fn decode(blob: &str) -> Option<Directory> {
        let json = BASE64
            .decode(blob.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| blob.to_string());
        match serde_json::from_str::<FileSystemItem>(&json) {
            Ok(FileSystemItem::Directory(root)) => Some(root),
            Ok(_) => None,
            Err(_) => serde_json::from_str::<Directory>(&json).ok(),
        }
    }
}

#[async_trait]
impl VfsStore for BackendStore {
    async fn load(&self) -> Directory {
        match self.backend.get(&self.key).await {
            Ok(Some(blob)) => match Self::decode(&blob) {
                Some(root) => root,
                None => {
                    log::warn!("persisted filesystem under '{}' is corrupt, using defaults", self.key);
                    default_root(&self.seed)
                }
            },
            Ok(None) => {
                let root = default_root(&self.seed);
                log::info!("seeding default filesystem under '{}'", self.key);
                if let Err(e) = self.save(&root).await {
                    log::warn!("failed to persist seeded filesystem: {}", e);
                }
                root
            }
            Err(e) => {
                log::warn!("failed to read persisted filesystem: {}", e);
                default_root(&self.seed)
            }
        }
    }

    async fn save(&self, root: &Directory) -> Result<(), StorageError> {
        let blob = Self::encode(root)?;
        self.backend.set(&self.key, &blob).await
    }

    async fn reset(&self) -> Result<Directory, StorageError> {
        self.backend.remove(&self.key).await?;
        log::info!("filesystem under '{}' reset to defaults", self.key);
        Ok(default_root(&self.seed))
    }
}

/// Memoizes `load` for a bounded duration.
pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    cached: Mutex<Option<(Instant, Directory)>>,
}

impl<S: VfsStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }

    pub async fn clear(&self) {
        *self.cached.lock().await = None;
    }
}

#[async_trait]
impl<S: VfsStore> VfsStore for CachedStore<S> {
    async fn load(&self) -> Directory {
        let mut cached = self.cached.lock().await;
        if let Some((at, root)) = cached.as_ref() {
            if at.elapsed() < self.ttl {
                return root.clone();
            }
        }
        let root = self.inner.load().await;
        *cached = Some((Instant::now(), root.clone()));
        root
    }

    async fn save(&self, root: &Directory) -> Result<(), StorageError> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        self.inner.save(root).await
    }

    async fn reset(&self) -> Result<Directory, StorageError> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        self.inner.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::types::File;

    fn store(backend: Arc<dyn StorageBackend>) -> BackendStore {
        BackendStore::new(backend, "data", SeedOptions::default())
    }

    fn names(root: &Directory) -> Vec<String> {
        root.content.iter().map(|c| c.name().to_string()).collect()
    }

    #[tokio::test]
    async fn test_load_seeds_and_persists_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        let root = store(backend.clone()).load().await;
        assert!(names(&root).contains(&"home".to_string()));
        assert!(backend.get("data").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let backend = Arc::new(MemoryBackend::new());
        let s = store(backend);
        let mut root = s.load().await;
        root.content.push(FileSystemItem::File(File::new("x.txt", "/x.txt", "payload", "user", "users")));
        s.save(&root).await.unwrap();

        let loaded = s.load().await;
        assert_eq!(loaded, root);
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back_to_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("data", "%%% not a tree %%%").await.unwrap();
        let root = store(backend).load().await;
        assert_eq!(root.full_path, "/");
        assert!(names(&root).contains(&"tmp".to_string()));
    }

    #[tokio::test]
    async fn test_raw_json_is_accepted() {
        let backend = Arc::new(MemoryBackend::new());
        let mut root = default_root(&SeedOptions::default());
        root.content.retain(|c| c.name() == "tmp");
        let json = serde_json::to_string(&FileSystemItem::Directory(root)).unwrap();
        backend.set("data", &json).await.unwrap();

        let loaded = store(backend).load().await;
        assert_eq!(names(&loaded), vec!["tmp".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_clears_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let s = store(backend.clone());
        s.load().await;
        let root = s.reset().await.unwrap();
        assert!(backend.get("data").await.unwrap().is_none());
        assert_eq!(root.full_path, "/");
    }

    #[tokio::test]
    async fn test_file_backend_roundtrip() {
        let dir = std::env::temp_dir().join(format!("zk-terminal-store-{}", std::process::id()));
        let backend = FileBackend::new(&dir);
        backend.set("data", "blob").await.unwrap();
        assert_eq!(backend.get("data").await.unwrap().as_deref(), Some("blob"));
        backend.remove("data").await.unwrap();
        assert!(backend.get("data").await.unwrap().is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_and_invalidates() {
        let backend = Arc::new(MemoryBackend::new());
        let cached = CachedStore::new(store(backend.clone()), Duration::from_secs(300));
        let first = cached.load().await;

        // A write behind the cache's back stays invisible until the TTL lapses.
        let mut other = first.clone();
        other.content.clear();
        store(backend.clone()).save(&other).await.unwrap();
        assert_eq!(cached.load().await, first);

        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cached.load().await.content.is_empty());

        cached.save(&first).await.unwrap();
        assert_eq!(cached.load().await, first);
    }
}
