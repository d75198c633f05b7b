//! SQLite storage layer.
//!
//! The document store backing the remote conversation log, over WAL-mode
//! SQLite with split read/write connection pools.

pub mod document_store;
pub mod pool;
