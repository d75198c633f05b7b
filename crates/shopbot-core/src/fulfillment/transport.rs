//! FulfillmentTransport trait definition.

use shopbot_types::error::TransportError;
use shopbot_types::fulfillment::{FulfillmentRequest, FulfillmentResponse};

/// A single request/response exchange with the fulfillment endpoint.
///
/// One call is one attempt; retrying is the client's job. A non-success
/// HTTP status must be reported as `TransportError::Status` and an
/// undecodable body as `TransportError::Body`.
///
/// Implementations live in shopbot-infra (e.g., `HttpFulfillmentTransport`).
pub trait FulfillmentTransport: Send + Sync {
    fn post(
        &self,
        request: &FulfillmentRequest,
    ) -> impl std::future::Future<Output = Result<FulfillmentResponse, TransportError>> + Send;
}
