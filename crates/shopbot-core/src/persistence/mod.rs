//! Conversation log persistence: a remote document store backend, a session
//! storage backend, and subscriptions over either.

pub mod box_store;
pub mod document_store;
pub mod local;
pub mod remote;
pub mod session_storage;
pub mod subscription;

pub use box_store::BoxDocumentStore;
pub use document_store::{CollectionChange, DocumentStore};
pub use local::{LocalSessionBackend, SESSION_STORAGE_KEY};
pub use remote::RemoteStoreBackend;
pub use session_storage::{MemorySessionStorage, SessionStorage};
pub use subscription::HistorySubscription;

use shopbot_types::conversation::BackendKind;
use shopbot_types::error::PersistenceError;
use shopbot_types::message::Message;

/// The backend holding the conversation log. Exactly one is active per
/// controller.
#[derive(Debug)]
pub enum PersistenceBackend {
    Remote(RemoteStoreBackend),
    Local(LocalSessionBackend),
}

impl PersistenceBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            PersistenceBackend::Remote(_) => BackendKind::RemoteStore,
            PersistenceBackend::Local(_) => BackendKind::LocalSession,
        }
    }

    /// Durably append `message`.
    pub async fn append(&mut self, message: &Message) -> Result<(), PersistenceError> {
        match self {
            PersistenceBackend::Remote(remote) => remote.append(message).await,
            PersistenceBackend::Local(local) => local.append(message),
        }
    }

    /// Open a subscription over the stored log.
    pub fn subscribe(&self) -> Result<HistorySubscription, PersistenceError> {
        match self {
            PersistenceBackend::Remote(remote) => {
                let changes = remote
                    .store()
                    .watch()
                    .map_err(|e| PersistenceError::ReadFailure(e.to_string()))?;
                Ok(HistorySubscription::remote(remote.clone(), changes))
            }
            PersistenceBackend::Local(local) => {
                Ok(HistorySubscription::local(local.messages().to_vec()))
            }
        }
    }
}
