//! Remote document store backend.
//!
//! One document per message in a per-identity collection. Rich fields are
//! stored as JSON strings; reading tolerates a broken rich field by dropping
//! it, which degrades that message to TEXT.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shopbot_types::document::{MessageDocument, StoredDocument, messages_collection_path};
use shopbot_types::error::PersistenceError;
use shopbot_types::message::{
    DEFAULT_REPLY_TEXT, Message, MessageType, ReplyContent,
};

use crate::clock::Clock;

use super::box_store::BoxDocumentStore;

/// Persistence backend over a remote document collection.
#[derive(Clone)]
pub struct RemoteStoreBackend {
    store: Arc<BoxDocumentStore>,
    collection: String,
    clock: Arc<dyn Clock>,
}

impl RemoteStoreBackend {
    /// Backend over the chat collection of `identity_id` in application `app_id`.
    pub fn new(
        store: Arc<BoxDocumentStore>,
        app_id: &str,
        identity_id: &str,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            collection: messages_collection_path(app_id, identity_id),
            clock,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &Arc<BoxDocumentStore> {
        &self.store
    }

    /// Write `message` as a document keyed by its id.
    pub async fn append(&self, message: &Message) -> Result<(), PersistenceError> {
        let document = encode_document(message)?;
        self.store
            .set_document(&self.collection, &message.id, &document)
            .await
            .map_err(|e| PersistenceError::WriteFailure(e.to_string()))?;
        debug!(collection = %self.collection, id = %message.id, "Message written to document store");
        Ok(())
    }

    /// Read the whole collection as a log sorted by timestamp.
    pub async fn load(&self) -> Result<Vec<Message>, PersistenceError> {
        let documents = self
            .store
            .list_documents(&self.collection)
            .await
            .map_err(|e| PersistenceError::ReadFailure(e.to_string()))?;

        let received_at = self.clock.now_millis();
        let mut messages: Vec<Message> = documents
            .into_iter()
            .map(|stored| decode_document(stored, received_at))
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}

impl std::fmt::Debug for RemoteStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStoreBackend")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

/// Convert a message to its stored document shape.
pub fn encode_document(message: &Message) -> Result<MessageDocument, PersistenceError> {
    let encode = |field: &str, result: serde_json::Result<String>| {
        result.map_err(|e| PersistenceError::WriteFailure(format!("{field}: {e}")))
    };

    let (product, custom_button) = match &message.content {
        ReplyContent::Text => (None, None),
        ReplyContent::ProductCard(product) => {
            (Some(encode("product", serde_json::to_string(product))?), None)
        }
        ReplyContent::CustomButton(button) => {
            (None, Some(encode("customButton", serde_json::to_string(button))?))
        }
    };

    Ok(MessageDocument {
        text: message.text.clone(),
        sender: message.sender,
        kind: Some(message.kind().to_string()),
        quick_replies: message.quick_replies.clone(),
        product,
        custom_button,
        timestamp: DateTime::<Utc>::from_timestamp_millis(message.timestamp),
    })
}

/// Convert a stored document back to a message.
///
/// `received_at` is the ordering key for documents without a timestamp.
pub fn decode_document(stored: StoredDocument, received_at: i64) -> Message {
    let StoredDocument { id, document } = stored;

    let kind = match document.kind.as_deref() {
        None => MessageType::Text,
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            warn!(id = %id, error = %e, "Unknown message type, reading as TEXT");
            MessageType::Text
        }),
    };

    let product = document
        .product
        .as_deref()
        .and_then(|raw| decode_field(&id, "product", raw));
    let custom_button = document
        .custom_button
        .as_deref()
        .and_then(|raw| decode_field(&id, "customButton", raw));

    let text = if document.text.is_empty() {
        DEFAULT_REPLY_TEXT.to_string()
    } else {
        document.text
    };

    Message {
        timestamp: document
            .timestamp
            .map(|t| t.timestamp_millis())
            .unwrap_or(received_at),
        id,
        sender: document.sender,
        text,
        quick_replies: document.quick_replies,
        content: ReplyContent::from_parts(kind, product, custom_button),
    }
}

fn decode_field<T: serde::de::DeserializeOwned>(id: &str, field: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = PersistenceError::DecodeFailure {
                field: field.to_string(),
                reason: e.to_string(),
            };
            warn!(id = %id, error = %err, "Dropping undecodable rich field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, MemoryDocumentStore};
    use shopbot_types::message::{BotReply, CustomButton, ProductCard, Sender};

    fn product() -> ProductCard {
        ProductCard {
            name: "Rose Box".to_string(),
            price: "350 EGP".to_string(),
            description: "Twelve red roses".to_string(),
            image_url: "https://example.com/rose.png".to_string(),
        }
    }

    fn backend(store: MemoryDocumentStore) -> RemoteStoreBackend {
        RemoteStoreBackend::new(
            Arc::new(BoxDocumentStore::new(store)),
            "app-1",
            "uid-1",
            Arc::new(FixedClock::new(5_000)),
        )
    }

    fn stored(id: &str, document: MessageDocument) -> StoredDocument {
        StoredDocument {
            id: id.to_string(),
            document,
        }
    }

    fn bare_document(text: &str) -> MessageDocument {
        MessageDocument {
            text: text.to_string(),
            sender: Sender::Bot,
            kind: None,
            quick_replies: vec![],
            product: None,
            custom_button: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_encode_serializes_rich_field_as_string() {
        let reply = BotReply {
            text: "here".to_string(),
            quick_replies: vec!["more".to_string()],
            content: ReplyContent::ProductCard(product()),
        };
        let doc = encode_document(&Message::bot(reply, 1_000)).unwrap();
        assert_eq!(doc.kind.as_deref(), Some("PRODUCT_CARD"));
        assert!(doc.product.as_deref().unwrap().contains("\"imageUrl\""));
        assert!(doc.custom_button.is_none());
        assert_eq!(doc.timestamp.unwrap().timestamp_millis(), 1_000);
    }

    #[tokio::test]
    async fn test_product_round_trip_is_lossless() {
        let backend = backend(MemoryDocumentStore::new());
        let reply = BotReply {
            text: "here".to_string(),
            quick_replies: vec!["more".to_string()],
            content: ReplyContent::ProductCard(product()),
        };
        let message = Message::bot(reply, 1_000);
        backend.append(&message).await.unwrap();

        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded, vec![message]);
    }

    #[tokio::test]
    async fn test_load_sorts_by_timestamp_regardless_of_write_order() {
        let backend = backend(MemoryDocumentStore::new());
        let first = Message::user("first", 1_000);
        let second = Message::user("second", 2_000);
        backend.append(&second).await.unwrap();
        backend.append(&first).await.unwrap();

        let loaded = backend.load().await.unwrap();
        let texts: Vec<&str> = loaded.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_broken_rich_field_degrades_to_text() {
        let mut doc = bare_document("contact us");
        doc.kind = Some("CUSTOM_BUTTON".to_string());
        doc.custom_button = Some("{not json".to_string());

        let message = decode_document(stored("7", doc), 9);
        assert_eq!(message.kind(), MessageType::Text);
        assert_eq!(message.text, "contact us");
        assert_eq!(message.id, "7");
    }

    #[test]
    fn test_unknown_or_missing_type_reads_as_text() {
        let mut doc = bare_document("x");
        doc.kind = Some("CAROUSEL".to_string());
        assert_eq!(decode_document(stored("1", doc), 0).kind(), MessageType::Text);

        let doc = bare_document("y");
        assert_eq!(decode_document(stored("2", doc), 0).kind(), MessageType::Text);
    }

    #[test]
    fn test_missing_timestamp_uses_receipt_time() {
        let message = decode_document(stored("1", bare_document("x")), 42);
        assert_eq!(message.timestamp, 42);
    }

    #[test]
    fn test_custom_button_decodes() {
        let button = CustomButton {
            initial_text: Some("hello".to_string()),
            button_label: None,
            color_class: Some("bg-blue-600".to_string()),
            is_custom_button: true,
        };
        let reply = BotReply {
            text: "call".to_string(),
            quick_replies: vec![],
            content: ReplyContent::CustomButton(button.clone()),
        };
        let doc = encode_document(&Message::bot(reply, 3)).unwrap();
        let message = decode_document(stored("3", doc), 0);
        assert_eq!(message.content.custom_button(), Some(&button));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let store = MemoryDocumentStore::new();
        store.set_available(false);
        let backend = backend(store);

        let err = backend.append(&Message::user("x", 1)).await.unwrap_err();
        assert!(matches!(err, PersistenceError::WriteFailure(_)));
    }
}
