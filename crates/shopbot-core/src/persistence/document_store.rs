//! Document store trait.
//!
//! Defines the interface for the remote document collection API.
//! Implementations live in shopbot-infra.

use tokio::sync::broadcast;

use shopbot_types::document::{MessageDocument, StoredDocument};
use shopbot_types::error::StoreError;

/// Notification that a document in `collection` was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChange {
    pub collection: String,
    pub document_id: String,
}

/// Trait for a collection-oriented document store with change notifications.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait DocumentStore: Send + Sync {
    /// Create or overwrite the document `id` in `collection`.
    fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &MessageDocument,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read every document in `collection`, in no particular order.
    fn list_documents(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;

    /// Receive a `CollectionChange` for every subsequent write to any
    /// collection. Callers filter by collection.
    fn watch(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError>;
}
