//! Infrastructure layer for the storefront chat assistant.
//!
//! Contains implementations of the port traits defined in `shopbot-core`:
//! the reqwest fulfillment transport, the SQLite document store, the
//! file-backed identity provider, plus configuration loading and outbound
//! contact links.

pub mod auth;
pub mod config;
pub mod fulfillment;
pub mod links;
pub mod sqlite;
