//! HttpFulfillmentTransport -- [`FulfillmentTransport`] over HTTPS with reqwest.
//!
//! One `post` is one attempt. Non-success statuses and connection errors are
//! reported as distinct `TransportError` variants so the client can decide
//! whether to retry.

use std::time::Duration;

use tracing::debug;

use shopbot_core::fulfillment::FulfillmentTransport;
use shopbot_types::config::FulfillmentConfig;
use shopbot_types::error::TransportError;
use shopbot_types::fulfillment::{FulfillmentRequest, FulfillmentResponse};

/// Fulfillment webhook transport.
#[derive(Debug, Clone)]
pub struct HttpFulfillmentTransport {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpFulfillmentTransport {
    /// Create a transport for the configured endpoint.
    ///
    /// `request_timeout_secs` bounds a single attempt.
    pub fn new(config: &FulfillmentConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Connection(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

impl FulfillmentTransport for HttpFulfillmentTransport {
    async fn post(&self, request: &FulfillmentRequest) -> Result<FulfillmentResponse, TransportError> {
        debug!(endpoint = %self.endpoint_url, "Posting fulfillment query");

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<FulfillmentResponse>()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}
