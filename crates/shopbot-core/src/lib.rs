//! Conversation logic and port traits for the storefront chat assistant.
//!
//! This crate defines the ports (transport, identity provider, document store,
//! session storage, clock) that the infrastructure layer implements. It
//! depends only on `shopbot-types`, never on `shopbot-infra` or any HTTP or
//! database crate.

pub mod clock;
pub mod controller;
pub mod fulfillment;
pub mod identity;
pub mod persistence;

#[cfg(test)]
pub(crate) mod testing;
