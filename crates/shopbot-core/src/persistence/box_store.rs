//! BoxDocumentStore -- object-safe dynamic dispatch wrapper for DocumentStore.
//!
//! 1. Define an object-safe `DocumentStoreDyn` trait with boxed futures
//! 2. Blanket-impl `DocumentStoreDyn` for all `T: DocumentStore`
//! 3. `BoxDocumentStore` wraps `Box<dyn DocumentStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use tokio::sync::broadcast;

use shopbot_types::document::{MessageDocument, StoredDocument};
use shopbot_types::error::StoreError;

use super::document_store::{CollectionChange, DocumentStore};

/// Object-safe version of [`DocumentStore`] with boxed futures.
pub trait DocumentStoreDyn: Send + Sync {
    fn set_document_boxed<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: &'a MessageDocument,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    fn list_documents_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send + 'a>>;

    fn watch_dyn(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError>;
}

impl<T: DocumentStore> DocumentStoreDyn for T {
    fn set_document_boxed<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: &'a MessageDocument,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.set_document(collection, id, document))
    }

    fn list_documents_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send + 'a>> {
        Box::pin(self.list_documents(collection))
    }

    fn watch_dyn(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError> {
        self.watch()
    }
}

/// Type-erased document store, so the controller can hold whichever store
/// the binary configured (or a test double) without a type parameter.
pub struct BoxDocumentStore {
    inner: Box<dyn DocumentStoreDyn + Send + Sync>,
}

impl BoxDocumentStore {
    /// Wrap a concrete `DocumentStore` in a type-erased box.
    pub fn new<T: DocumentStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &MessageDocument,
    ) -> Result<(), StoreError> {
        self.inner.set_document_boxed(collection, id, document).await
    }

    pub async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.inner.list_documents_boxed(collection).await
    }

    pub fn watch(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError> {
        self.inner.watch_dyn()
    }
}

impl std::fmt::Debug for BoxDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxDocumentStore").finish_non_exhaustive()
    }
}
