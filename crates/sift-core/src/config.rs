//! Client configuration
//!
//! Resolved in two layers: an optional TOML file at
//! `<config dir>/sift/config.toml`, then built-in defaults. The
//! `SIFT_BASE_URL` and `SIFT_API_KEY` environment variables override both.
//!
//! ```toml
//! base_url = "https://finance.example.net"
//! timeout_secs = 15
//! suggestion_cache_ttl_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long a suggestion result satisfies identical queries
    pub suggestion_cache_ttl: Duration,
    /// Descriptions shorter than this never trigger a fetch
    pub min_description_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            api_key: None,
            timeout: Duration::from_secs(15),
            suggestion_cache_ttl: Duration::from_secs(30),
            min_description_len: 3,
        }
    }
}

/// On-disk shape; every field optional so partial files work
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    suggestion_cache_ttl_secs: Option<u64>,
    min_description_len: Option<usize>,
}

impl ClientConfig {
    /// Load from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Load from an explicit file, then apply env overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::from_file(path)?.with_env_overrides())
    }

    /// `<config dir>/sift/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sift").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let defaults = Self::default();
        Ok(Self {
            base_url: file
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: file.api_key.or(defaults.api_key),
            timeout: file
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            suggestion_cache_ttl: file
                .suggestion_cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.suggestion_cache_ttl),
            min_description_len: file
                .min_description_len
                .unwrap_or(defaults.min_description_len),
        })
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SIFT_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim_end_matches('/').to_string();
            }
        }
        if let Ok(key) = std::env::var("SIFT_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}
