//! SQLite document store implementation.
//!
//! Implements `DocumentStore` from `shopbot-core` using sqlx with split
//! read/write pools. Each document's fields are stored as JSON text; every
//! write is announced on a broadcast channel shared by all clones.

use chrono::Utc;
use sqlx::Row;
use tokio::sync::broadcast;
use tracing::warn;

use shopbot_core::persistence::{CollectionChange, DocumentStore};
use shopbot_types::document::{MessageDocument, StoredDocument};
use shopbot_types::error::StoreError;

use super::pool::DatabasePool;

/// Capacity of the change feed. Lagging subscribers re-read the collection.
const CHANGE_FEED_CAPACITY: usize = 256;

/// SQLite-backed implementation of `DocumentStore`.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: DatabasePool,
    changes: broadcast::Sender<CollectionChange>,
}

impl SqliteDocumentStore {
    /// Create a new document store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { pool, changes }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct DocumentRow {
    doc_id: String,
    fields: String,
}

impl DocumentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            doc_id: row.try_get("doc_id")?,
            fields: row.try_get("fields")?,
        })
    }

    fn into_stored(self) -> Result<StoredDocument, StoreError> {
        let document: MessageDocument = serde_json::from_str(&self.fields)
            .map_err(|e| StoreError::Serialization(format!("document {}: {e}", self.doc_id)))?;
        Ok(StoredDocument {
            id: self.doc_id,
            document,
        })
    }
}

// ---------------------------------------------------------------------------
// DocumentStore implementation
// ---------------------------------------------------------------------------

impl DocumentStore for SqliteDocumentStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &MessageDocument,
    ) -> Result<(), StoreError> {
        let fields = serde_json::to_string(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO documents (collection, doc_id, fields, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (collection, doc_id) DO UPDATE SET fields = excluded.fields, updated_at = excluded.updated_at"#,
        )
        .bind(collection)
        .bind(id)
        .bind(&fields)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let _ = self.changes.send(CollectionChange {
            collection: collection.to_string(),
            document_id: id.to_string(),
        });
        Ok(())
    }

    /// Documents whose fields no longer parse are skipped with a warning.
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query("SELECT doc_id, fields FROM documents WHERE collection = ? ORDER BY doc_id")
            .bind(collection)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let row = DocumentRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            match row.into_stored() {
                Ok(stored) => documents.push(stored),
                Err(e) => warn!(collection, error = %e, "Skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    fn watch(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError> {
        Ok(self.changes.subscribe())
    }
}
