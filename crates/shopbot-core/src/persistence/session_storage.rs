//! Session-scoped key/value storage.
//!
//! Lives as long as the process; nothing survives a restart.

use std::sync::Arc;

use dashmap::DashMap;

use shopbot_types::error::PersistenceError;

/// Synchronous string key/value storage for the current session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// In-process `SessionStorage`. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    entries: Arc<DashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemorySessionStorage::new();
        let other = storage.clone();

        storage.set_item("k", "v".to_string()).unwrap();
        assert_eq!(other.get_item("k").as_deref(), Some("v"));

        other.set_item("k", "w".to_string()).unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("w"));
    }

    #[test]
    fn test_fresh_storage_is_empty() {
        let storage = MemorySessionStorage::new();
        assert!(storage.get_item("missing").is_none());
    }
}
