//! Shared domain types for the storefront chat assistant.
//!
//! Messages and bot replies, the fulfillment wire format, the remote document
//! shape, identity and conversation state, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod fulfillment;
pub mod identity;
pub mod message;
