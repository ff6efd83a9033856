//! Durable storage for persisted rotation indices.
//!
//! The store is fail-soft by contract: `read` yields present or absent,
//! never an error, and `write` swallows failures. A lost write only means
//! the rotation is not remembered next session, which is acceptable
//! degradation. Callers therefore cannot forget the fail-soft contract.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

pub mod local;

// Re-export for convenience
pub use local::LocalIndexStore;

/// Key-value store mapping a feed identifier to its last-shown index.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Read a stored index. Missing keys, non-numeric values and access
    /// errors all yield `None`.
    async fn read(&self, key: &str) -> Option<u64>;

    /// Store an index. Failures are logged and swallowed.
    async fn write(&self, key: &str, index: u64);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    map: Mutex<HashMap<String, u64>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn read(&self, key: &str) -> Option<u64> {
        self.map.lock().ok()?.get(key).copied()
    }

    async fn write(&self, key: &str, index: u64) {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_string(), index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryIndexStore::new();
        assert_eq!(store.read("facts.index").await, None);
        store.write("facts.index", 4).await;
        assert_eq!(store.read("facts.index").await, Some(4));
        store.write("facts.index", 0).await;
        assert_eq!(store.read("facts.index").await, Some(0));
    }
}
