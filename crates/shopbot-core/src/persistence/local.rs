//! Session storage backend.
//!
//! Keeps the log in memory and rewrites it as one JSON array under a single
//! session storage key after every change.

use std::sync::Arc;

use tracing::{debug, warn};

use shopbot_types::error::PersistenceError;
use shopbot_types::message::Message;

use super::session_storage::SessionStorage;

/// Session storage key holding the serialized log.
pub const SESSION_STORAGE_KEY: &str = "gift_shop_chat_messages";

/// Persistence backend over session storage.
pub struct LocalSessionBackend {
    storage: Arc<dyn SessionStorage>,
    messages: Vec<Message>,
}

impl LocalSessionBackend {
    /// Open the backend, loading whatever log the storage already holds.
    ///
    /// Unparseable stored data loads as an empty log.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let messages = match storage.get_item(SESSION_STORAGE_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(error = %e, "Stored session log is unreadable, starting empty");
                    Vec::new()
                }
            },
        };
        debug!(count = messages.len(), "Session log loaded");
        Self { storage, messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append `message` and persist the whole log.
    pub fn append(&mut self, message: &Message) -> Result<(), PersistenceError> {
        self.messages.push(message.clone());
        self.persist()
    }

    /// Replace the log with `messages` and persist it.
    pub fn replace_all(&mut self, messages: &[Message]) -> Result<(), PersistenceError> {
        self.messages = messages.to_vec();
        self.persist()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&self.messages)
            .map_err(|e| PersistenceError::WriteFailure(e.to_string()))?;
        self.storage.set_item(SESSION_STORAGE_KEY, raw)
    }
}

impl std::fmt::Debug for LocalSessionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSessionBackend")
            .field("messages", &self.messages.len())
            .finish()
    }
}
