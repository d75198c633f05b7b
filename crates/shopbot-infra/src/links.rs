//! Outbound messaging-app deep links.
//!
//! Product cards and custom buttons hand the customer over to a human via a
//! `wa.me` link with prefilled text.

use reqwest::Url;
use thiserror::Error;

use shopbot_types::message::{CustomButton, ProductCard};

/// Prefill used by a custom button without `initialText`.
pub const DEFAULT_CONTACT_TEXT: &str = "السلام عليكم، أرغب في التواصل بخصوص استفسار إداري.";

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid contact number: '{0}'")]
    InvalidNumber(String),
}

/// `https://wa.me/<number>?text=<prefill>`, the prefill percent-encoded
/// (spaces as `%20`, not `+`).
pub fn contact_link(number: &str, text: &str) -> Result<Url, LinkError> {
    let digits = number.trim().trim_start_matches('+');
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(LinkError::InvalidNumber(number.to_string()));
    }
    Url::parse(&format!("https://wa.me/{digits}?text={}", encode_component(text)))
        .map_err(|_| LinkError::InvalidNumber(number.to_string()))
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Purchase prefill for a product.
pub fn purchase_text(product_name: &str) -> String {
    format!("أرغب في شراء {product_name}")
}

/// Link asking to buy `product`.
pub fn product_link(number: &str, product: &ProductCard) -> Result<Url, LinkError> {
    contact_link(number, &purchase_text(&product.name))
}

/// Link for a custom button, falling back to the default contact text.
pub fn button_link(number: &str, button: &CustomButton) -> Result<Url, LinkError> {
    let text = button
        .initial_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_CONTACT_TEXT);
    contact_link(number, text)
}
