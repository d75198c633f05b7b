//! Classification of fulfillment responses into a `BotReply`.
//!
//! Precedence is fixed: a product card wins over a custom button, which wins
//! over plain text. The function is total; any response envelope produces a
//! reply.

use serde_json::Value;

use shopbot_types::fulfillment::{FulfillmentMessage, QueryResult};
use shopbot_types::message::{
    BotReply, CustomButton, DEFAULT_REPLY_TEXT, ProductCard, ReplyContent,
};

/// Price shown when a product card omits one.
pub const DEFAULT_PRODUCT_PRICE: &str = "غير محدد";

/// Description shown when a product card omits one.
pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "لا يوجد وصف.";

/// Text of a custom-button reply without `fulfillmentText`.
pub const DEFAULT_BUTTON_TEXT: &str = "يرجى التواصل مع الدعم.";

/// Normalize a `queryResult` envelope into a reply.
pub fn normalize_reply(result: &QueryResult) -> BotReply {
    let messages = &result.fulfillment_messages;
    let fulfillment_text = result
        .fulfillment_text
        .as_deref()
        .filter(|text| !text.is_empty());

    let text = fulfillment_text
        .or_else(|| first_text(messages))
        .unwrap_or(DEFAULT_REPLY_TEXT)
        .to_string();

    let quick_replies = messages
        .iter()
        .filter_map(|m| m.quick_replies.as_ref())
        .find(|entry| !entry.quick_replies.is_empty())
        .map(|entry| entry.quick_replies.clone())
        .unwrap_or_default();

    let payload = messages.iter().find_map(|m| m.payload.as_ref());

    if let Some(product) = payload.and_then(|p| p.get("productCard")).and_then(product_card) {
        return BotReply {
            text,
            quick_replies,
            content: ReplyContent::ProductCard(product),
        };
    }

    if let Some(button) = payload.and_then(|p| p.get("customButton")).and_then(custom_button) {
        return BotReply {
            text: fulfillment_text.unwrap_or(DEFAULT_BUTTON_TEXT).to_string(),
            quick_replies,
            content: ReplyContent::CustomButton(button),
        };
    }

    BotReply {
        text,
        quick_replies,
        content: ReplyContent::Text,
    }
}

/// First element of the first `text.text` list that has one.
fn first_text(messages: &[FulfillmentMessage]) -> Option<&str> {
    messages
        .iter()
        .filter_map(|m| m.text.as_ref())
        .find(|entry| !entry.text.is_empty())
        .and_then(|entry| entry.text.first())
        .map(String::as_str)
        .filter(|text| !text.is_empty())
}

/// A product card needs both a name and an image.
fn product_card(value: &Value) -> Option<ProductCard> {
    let name = scalar_text(value.get("name")?)?;
    let image_url = scalar_text(value.get("imageUrl")?)?;
    Some(ProductCard {
        name,
        price: value
            .get("price")
            .and_then(scalar_text)
            .unwrap_or_else(|| DEFAULT_PRODUCT_PRICE.to_string()),
        description: value
            .get("description")
            .and_then(scalar_text)
            .unwrap_or_else(|| DEFAULT_PRODUCT_DESCRIPTION.to_string()),
        image_url,
    })
}

fn custom_button(value: &Value) -> Option<CustomButton> {
    if value.get("isCustomButton").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    Some(CustomButton {
        initial_text: value.get("initialText").and_then(scalar_text),
        button_label: value.get("buttonLabel").and_then(scalar_text),
        color_class: value.get("colorClass").and_then(scalar_text),
        is_custom_button: true,
    })
}

/// Non-empty strings and non-zero numbers as text; anything else is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
