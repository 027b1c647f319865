//! Shell configuration, loadable from TOML.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::fs::SeedOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Limits for network-backed commands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request hard cutoff.
    pub timeout_ms: u64,
    /// Politeness delay between mirror requests.
    pub crawl_delay_ms: u64,
    pub max_mirror_files: usize,
    pub max_links_per_page: usize,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            crawl_delay_ms: 100,
            max_mirror_files: 100,
            max_links_per_page: 20,
        }
    }
}

impl NetworkSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub home_dir: String,
    pub username: String,
    pub hostname: String,
    pub initial_dir: String,
    /// Key the serialized tree is stored under.
    pub storage_key: String,
    pub max_input_len: usize,
    /// Minimum spacing between submitted lines; 0 disables the gate.
    pub rate_limit_ms: u64,
    pub cache_ttl_secs: u64,
    pub max_file_size: usize,
    pub history_size: usize,
    /// Bound on nested command lines run by `source`, `bash -c`, `fg` and functions.
    pub max_nesting: usize,
    pub page_size: usize,
    pub long_page_size: usize,
    pub network: NetworkSettings,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home_dir: "/home/user".to_string(),
            username: "user".to_string(),
            hostname: "zk-terminal".to_string(),
            initial_dir: "/home/user".to_string(),
            storage_key: "data".to_string(),
            max_input_len: 10_000,
            rate_limit_ms: 100,
            cache_ttl_secs: 300,
            max_file_size: 10 * 1024 * 1024,
            history_size: 1000,
            max_nesting: 16,
            page_size: 50,
            long_page_size: 20,
            network: NetworkSettings::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            home_dir: self.home_dir.clone(),
            username: self.username.clone(),
            hostname: self.hostname.clone(),
        }
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
