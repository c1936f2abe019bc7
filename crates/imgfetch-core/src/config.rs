use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum accepted image size: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reference body chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

fn default_download_dir() -> PathBuf {
    PathBuf::from("Fetched_Images")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("downloaded_hashes.txt")
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_allowed_extensions() -> BTreeSet<String> {
    [".jpg", ".jpeg", ".png", ".gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Fetch policy and storage locations, loaded from `~/.config/imgfetch/config.toml`.
///
/// Every field has a default, so a partial (or empty) file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Directory images are saved into (created if absent).
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Plain-text dedup ledger, one hex SHA-256 per line.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// Maximum accepted body size in bytes, declared or actual.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed filename extensions, lowercase with a leading dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: BTreeSet<String>,
    /// Connect timeout and stall timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Receive buffer size in bytes; body data is written in chunks of at most this size.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            ledger_path: default_ledger_path(),
            max_file_size: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Lowercases extensions and adds the leading dot where missing (`"PNG"` → `".png"`).
    pub fn normalized(mut self) -> Self {
        self.allowed_extensions = self
            .allowed_extensions
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty() && *e != ".")
            .map(|e| {
                let lower = e.to_ascii_lowercase();
                if lower.starts_with('.') {
                    lower
                } else {
                    format!(".{}", lower)
                }
            })
            .collect();
        self
    }

    /// True if `ext` (with leading dot, any case) is in the allow-list.
    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions.contains(&ext.to_ascii_lowercase())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg.normalized())
}
