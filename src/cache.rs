//! Persisted key/value store offered to extensions.
//!
//! The request pipeline never reads or writes it. Extensions receive it
//! through `ExtensionContext`, and the binary saves it on shutdown.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl Cache {
    /// Opens the store at `path`, creating it as `{}` when missing.
    /// Content that is not a JSON object loads as an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if fs::metadata(&path).await.is_err() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, b"{}")
                .await
                .with_context(|| format!("creating cache file {}", path.display()))?;
        }

        let raw = fs::read(&path)
            .await
            .with_context(|| format!("reading cache file {}", path.display()))?;
        let entries = match serde_json::from_slice::<Map<String, Value>>(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable cache, starting empty");
                Map::new()
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.write().await.insert(key.into(), value)
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().await.remove(key)
    }

    pub async fn snapshot(&self) -> Map<String, Value> {
        self.entries.read().await.clone()
    }

    /// Writes the current entries back to disk as pretty-printed JSON.
    pub async fn save(&self) -> anyhow::Result<()> {
        let raw = {
            let entries = self.entries.read().await;
            serde_json::to_vec_pretty(&*entries)?
        };
        fs::write(&self.path, raw)
            .await
            .with_context(|| format!("saving cache file {}", self.path.display()))?;
        Ok(())
    }
}
