//! File System Module
//!
//! A single rooted tree of directories, files and symlinks, persisted as one
//! blob through a pluggable store:
//! - `TreeFs`: the operations handed to commands
//! - `BackendStore` / `CachedStore`: load/save/reset over a key-value backend

pub mod archive;
pub mod defaults;
pub mod store;
pub mod tree;
pub mod tree_fs;
pub mod types;

pub use defaults::SeedOptions;
pub use store::{BackendStore, CachedStore, FileBackend, MemoryBackend, StorageBackend, StorageError, VfsStore};
pub use tree_fs::TreeFs;
pub use types::*;
