//! Conversation message and bot reply types.
//!
//! A `Message` is one entry in the append-only conversation log. Rich content
//! (product cards, call-to-action buttons) is modelled as the `ReplyContent`
//! tagged union, so a message can never carry a product and a button at once
//! or carry rich content under the wrong type.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Fallback text shown when a reply carries no usable text.
pub const DEFAULT_REPLY_TEXT: &str = "لم يتم الحصول على رد نصي.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Rendering type of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Text,
    ProductCard,
    CustomButton,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Text => write!(f, "TEXT"),
            MessageType::ProductCard => write!(f, "PRODUCT_CARD"),
            MessageType::CustomButton => write!(f, "CUSTOM_BUTTON"),
        }
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TEXT" => Ok(MessageType::Text),
            "PRODUCT_CARD" => Ok(MessageType::ProductCard),
            "CUSTOM_BUTTON" => Ok(MessageType::CustomButton),
            other => Err(format!("invalid message type: '{other}'")),
        }
    }
}

/// Product descriptor carried by a `PRODUCT_CARD` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
}

/// Call-to-action descriptor carried by a `CUSTOM_BUTTON` reply.
///
/// Every display field is optional; the renderer substitutes defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomButton {
    /// Prefill text for the outbound contact link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    /// Presentation hint (a CSS class in the web front-end).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_class: Option<String>,
    #[serde(default)]
    pub is_custom_button: bool,
}

/// Rich content of a reply, tagged by message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    Text,
    ProductCard(ProductCard),
    CustomButton(CustomButton),
}

impl ReplyContent {
    /// The message type this content renders as.
    pub fn kind(&self) -> MessageType {
        match self {
            ReplyContent::Text => MessageType::Text,
            ReplyContent::ProductCard(_) => MessageType::ProductCard,
            ReplyContent::CustomButton(_) => MessageType::CustomButton,
        }
    }

    pub fn product(&self) -> Option<&ProductCard> {
        match self {
            ReplyContent::ProductCard(product) => Some(product),
            _ => None,
        }
    }

    pub fn custom_button(&self) -> Option<&CustomButton> {
        match self {
            ReplyContent::CustomButton(button) => Some(button),
            _ => None,
        }
    }

    /// Rebuild content from a declared type and optional rich fields.
    ///
    /// A declared rich type whose payload is missing collapses to `Text`;
    /// payloads that do not match the declared type are ignored.
    pub fn from_parts(
        kind: MessageType,
        product: Option<ProductCard>,
        custom_button: Option<CustomButton>,
    ) -> Self {
        match (kind, product, custom_button) {
            (MessageType::ProductCard, Some(product), _) => ReplyContent::ProductCard(product),
            (MessageType::CustomButton, _, Some(button)) => ReplyContent::CustomButton(button),
            _ => ReplyContent::Text,
        }
    }
}

/// Normalized reply produced by one fulfillment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    pub quick_replies: Vec<String>,
    pub content: ReplyContent,
}

impl BotReply {
    /// A plain text reply with no quick replies.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_replies: Vec::new(),
            content: ReplyContent::Text,
        }
    }

    pub fn kind(&self) -> MessageType {
        self.content.kind()
    }
}

impl Serialize for BotReply {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReplyRecord::from(self).serialize(serializer)
    }
}

/// One entry of the conversation log.
///
/// `id` is derived from the creation time in milliseconds; `timestamp` is the
/// ordering key. Serialized flat, with `type`, `product` and `customButton`
/// fields, which is the shape stored in session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MessageRecord", into = "MessageRecord")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub quick_replies: Vec<String>,
    pub content: ReplyContent,
    pub timestamp: i64,
}

impl Message {
    /// A user-authored text message stamped with `timestamp`.
    pub fn user(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: timestamp.to_string(),
            sender: Sender::User,
            text: text.into(),
            quick_replies: Vec::new(),
            content: ReplyContent::Text,
            timestamp,
        }
    }

    /// A bot message carrying the given reply.
    pub fn bot(reply: BotReply, timestamp: i64) -> Self {
        Self {
            id: timestamp.to_string(),
            sender: Sender::Bot,
            text: reply.text,
            quick_replies: reply.quick_replies,
            content: reply.content,
            timestamp,
        }
    }

    pub fn kind(&self) -> MessageType {
        self.content.kind()
    }
}

/// Flat serde shape shared by `Message` and `BotReply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRecord {
    id: String,
    sender: Sender,
    #[serde(rename = "type", default = "default_message_type")]
    kind: MessageType,
    #[serde(default)]
    text: String,
    #[serde(default)]
    quick_replies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<ProductCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_button: Option<CustomButton>,
    timestamp: i64,
}

fn default_message_type() -> MessageType {
    MessageType::Text
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        let text = if record.text.is_empty() {
            DEFAULT_REPLY_TEXT.to_string()
        } else {
            record.text
        };
        Self {
            id: record.id,
            sender: record.sender,
            text,
            quick_replies: record.quick_replies,
            content: ReplyContent::from_parts(record.kind, record.product, record.custom_button),
            timestamp: record.timestamp,
        }
    }
}

impl From<Message> for MessageRecord {
    fn from(message: Message) -> Self {
        let kind = message.kind();
        let (product, custom_button) = match message.content {
            ReplyContent::Text => (None, None),
            ReplyContent::ProductCard(product) => (Some(product), None),
            ReplyContent::CustomButton(button) => (None, Some(button)),
        };
        Self {
            id: message.id,
            sender: message.sender,
            kind,
            text: message.text,
            quick_replies: message.quick_replies,
            product,
            custom_button,
            timestamp: message.timestamp,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRecord<'a> {
    #[serde(rename = "type")]
    kind: MessageType,
    text: &'a str,
    quick_replies: &'a [String],
    product: Option<&'a ProductCard>,
    custom_button: Option<&'a CustomButton>,
}

impl<'a> From<&'a BotReply> for ReplyRecord<'a> {
    fn from(reply: &'a BotReply) -> Self {
        Self {
            kind: reply.kind(),
            text: &reply.text,
            quick_replies: &reply.quick_replies,
            product: reply.content.product(),
            custom_button: reply.content.custom_button(),
        }
    }
}
