//! Document shape of a message in the remote document store.
//!
//! Rich fields are stored as JSON-encoded strings rather than nested objects,
//! and the stored `timestamp` is the ordering key on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Sender;

/// A message as written to (and read back from) the remote document store.
///
/// `kind` is kept as the raw stored string so unknown values can be read
/// leniently as `TEXT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDocument {
    #[serde(default)]
    pub text: String,
    pub sender: Sender,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quick_replies: Vec<String>,
    /// JSON-encoded `ProductCard`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// JSON-encoded `CustomButton`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_button: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A stored document together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub document: MessageDocument,
}

/// Build the per-identity collection path for chat messages.
///
/// The application instance id namespaces identities so several storefronts
/// can share one store.
pub fn messages_collection_path(app_id: &str, identity_id: &str) -> String {
    format!("artifacts/{app_id}/users/{identity_id}/chat_messages")
}
