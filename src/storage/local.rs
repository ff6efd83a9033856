//! Local filesystem index store.
//!
//! One file per key under the state directory, each holding the decimal
//! index as text. Writes go to a temp file first and are renamed into
//! place so a crash never leaves a half-written index behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::storage::IndexStore;

/// File-backed index store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct LocalIndexStore {
    root_dir: PathBuf,
}

impl LocalIndexStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    async fn write_atomic(&self, key: &str, text: &str) -> std::io::Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await
    }
}

#[async_trait]
impl IndexStore for LocalIndexStore {
    async fn read(&self, key: &str) -> Option<u64> {
        let path = self.path(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No stored index at {}", path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Index read failed for {}: {}", path.display(), e);
                return None;
            }
        };

        match raw.trim().parse::<u64>() {
            Ok(index) => Some(index),
            Err(e) => {
                log::warn!(
                    "Stored index at {} is not a valid number ({e}); treating as absent",
                    path.display()
                );
                None
            }
        }
    }

    async fn write(&self, key: &str, index: u64) {
        if let Err(e) = self.write_atomic(key, &index.to_string()).await {
            log::warn!("Index write failed for '{key}': {e}");
        }
    }
}
