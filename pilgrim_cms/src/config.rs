//! Configuration types and loading for pilgrim-cms.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
#[cfg(not(feature = "http"))]
use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::store::{AnyStore, DocumentKey, FileStore, MemoryStore};

pub const DEFAULT_STORE_ROOT: &str = "~/.pilgrim-cms/store";
pub const DEFAULT_PREFS_DIR: &str = "~/.pilgrim-cms/prefs";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration file format.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub store: Option<StoreConfig>,
    pub collection: Option<String>,
    pub name: Option<String>,
    pub status_file: Option<String>,
    pub prefs_dir: Option<String>,
    pub log_level: Option<String>,
}

/// Where the site document lives.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    File {
        root: String,
    },
    Http {
        base_url: String,
        timeout_ms: Option<u64>,
    },
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreTarget {
    File(PathBuf),
    Http { base_url: String, timeout: Duration },
    Memory,
}

/// Resolved runtime parameters.
#[derive(Clone, Debug)]
pub struct ResolvedParams {
    pub store: StoreTarget,
    pub key: DocumentKey,
    pub status_file: Option<PathBuf>,
    pub prefs_dir: PathBuf,
    pub log_level: String,
}

impl ResolvedParams {
    pub fn build_store(&self) -> Result<AnyStore> {
        match &self.store {
            StoreTarget::File(root) => Ok(AnyStore::File(FileStore::new(
                root.clone(),
                self.key.clone(),
            ))),
            StoreTarget::Memory => Ok(AnyStore::Memory(MemoryStore::new())),
            #[cfg(feature = "http")]
            StoreTarget::Http { base_url, timeout } => Ok(AnyStore::Http(
                crate::store::HttpStore::new(base_url, &self.key, *timeout)?,
            )),
            #[cfg(not(feature = "http"))]
            StoreTarget::Http { base_url, .. } => {
                bail!("store {base_url} needs the `http` feature; rebuild with --features http")
            }
        }
    }
}

/// CLI options that can override config file settings.
///
/// Lets the binary pass its arguments to [`resolve_params`] without the
/// library depending on clap.
pub trait CliOptions {
    fn store_root(&self) -> Option<PathBuf>;
    fn store_url(&self) -> Option<String>;
    fn collection(&self) -> Option<String>;
    fn name(&self) -> Option<String>;
    fn status_file(&self) -> Option<PathBuf>;
    fn prefs_dir(&self) -> Option<PathBuf>;
    fn log_level(&self) -> Option<String>;
}

pub fn expand_path(raw: impl AsRef<str>) -> PathBuf {
    let s = raw.as_ref();
    if let Some(stripped) = s.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(s)
}

/// Load a TOML, YAML or JSON config by extension. A missing file is `None`.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let cfg: Config = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse yaml config {}", path.display()))?,
        "toml" => toml::from_str(&data)
            .with_context(|| format!("failed to parse toml config {}", path.display()))?,
        _ => serde_json::from_str(&data)
            .with_context(|| format!("failed to parse json config {}", path.display()))?,
    };
    Ok(Some(cfg))
}

/// Resolve runtime parameters. CLI options take precedence over the config
/// file, which takes precedence over built-in defaults.
pub fn resolve_params<C: CliOptions>(cli: &C, config: Option<&Config>) -> ResolvedParams {
    let cfg = config.cloned().unwrap_or_default();

    let store = if let Some(root) = cli.store_root() {
        StoreTarget::File(root)
    } else if let Some(base_url) = cli.store_url() {
        StoreTarget::Http {
            base_url,
            timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    } else {
        match cfg.store {
            Some(StoreConfig::File { root }) => StoreTarget::File(expand_path(root)),
            Some(StoreConfig::Http {
                base_url,
                timeout_ms,
            }) => StoreTarget::Http {
                base_url,
                timeout: Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)),
            },
            Some(StoreConfig::Memory) => StoreTarget::Memory,
            None => StoreTarget::File(expand_path(DEFAULT_STORE_ROOT)),
        }
    };

    let defaults = DocumentKey::default();
    let key = DocumentKey {
        collection: cli
            .collection()
            .or(cfg.collection)
            .unwrap_or(defaults.collection),
        name: cli.name().or(cfg.name).unwrap_or(defaults.name),
    };

    let status_file = cli
        .status_file()
        .or_else(|| cfg.status_file.map(expand_path));

    let prefs_dir = cli
        .prefs_dir()
        .or_else(|| cfg.prefs_dir.map(expand_path))
        .unwrap_or_else(|| expand_path(DEFAULT_PREFS_DIR));

    let log_level = cli
        .log_level()
        .or(cfg.log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    ResolvedParams {
        store,
        key,
        status_file,
        prefs_dir,
        log_level,
    }
}
