//! Fulfillment client: transport port, retry schedule, and reply normalization.

pub mod client;
pub mod normalize;
pub mod retry;
pub mod transport;

pub use client::FulfillmentClient;
pub use normalize::normalize_reply;
pub use retry::RetryPolicy;
pub use transport::FulfillmentTransport;
