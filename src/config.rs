use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Server settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ip_whitelist_enabled: bool,
    pub ip_whitelist: BTreeSet<String>,
    /// Directories, rooted at the web root and starting with `/`, that may
    /// be listed when they have no index file.
    pub browsable_dirs: BTreeSet<String>,
    /// Request path of the favicon file inside the web root.
    pub favicon: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ip_whitelist_enabled: false,
            ip_whitelist: BTreeSet::from(["127.0.0.1".to_string()]),
            browsable_dirs: BTreeSet::from(["/".to_string()]),
            favicon: Some("/favicon.ico".to_string()),
        }
    }
}

impl Config {
    /// Loads the config file, writing the defaults there first if it does
    /// not exist yet. An unreadable or invalid file falls back to defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let defaults = Self::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory {}", parent.display()))?;
            }
            let yaml = serde_yaml::to_string(&defaults)?;
            std::fs::write(path, yaml)
                .with_context(|| format!("writing default config to {}", path.display()))?;
            info!(path = %path.display(), "Wrote default config");
            return Ok(defaults);
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| Self::from_yaml(&raw).map_err(anyhow::Error::from));

        match parsed {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_browsable(&self, route: &str) -> bool {
        self.browsable_dirs.contains(route)
    }
}

/// Locations of everything the server keeps on disk, derived from one base
/// directory.
#[derive(Debug, Clone)]
pub struct ServerPaths {
    pub web_root: PathBuf,
    pub config_file: PathBuf,
    pub cache_file: PathBuf,
}

impl ServerPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            web_root: base.join("root"),
            config_file: base.join("config").join("server.yaml"),
            cache_file: base.join("cache.json"),
        }
    }

    /// Base directory from `LYNX_HOME`, or the working directory.
    pub fn from_env() -> Self {
        let base = std::env::var("LYNX_HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(base)
    }
}
