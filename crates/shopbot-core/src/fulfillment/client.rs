//! FulfillmentClient: send a query, retry transient failures, normalize.

use tracing::{debug, warn};

use shopbot_types::config::FulfillmentConfig;
use shopbot_types::error::{FulfillmentError, TransportError};
use shopbot_types::fulfillment::FulfillmentRequest;
use shopbot_types::message::BotReply;

use crate::clock::Sleeper;

use super::normalize::normalize_reply;
use super::retry::RetryPolicy;
use super::transport::FulfillmentTransport;

/// Talks to the fulfillment endpoint on behalf of the conversation.
///
/// Generic over the transport and the sleeper so the retry schedule can be
/// exercised without a network or real timers.
pub struct FulfillmentClient<T: FulfillmentTransport, S: Sleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
    session: String,
    language_code: String,
    platform: String,
}

impl<T: FulfillmentTransport, S: Sleeper> FulfillmentClient<T, S> {
    pub fn new(transport: T, sleeper: S, config: &FulfillmentConfig) -> Self {
        Self {
            transport,
            sleeper,
            policy: RetryPolicy::from_config(config),
            session: config.session.clone(),
            language_code: config.language_code.clone(),
            platform: config.platform.clone(),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Access the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `query` and return the normalized reply.
    ///
    /// Never fails: network exhaustion and malformed responses become a TEXT
    /// reply describing the failure.
    pub async fn send(&self, query: &str) -> BotReply {
        match self.try_send(query).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Fulfillment call failed");
                BotReply::text(e.user_message())
            }
        }
    }

    /// Send `query`, surfacing the failure classification.
    pub async fn try_send(&self, query: &str) -> Result<BotReply, FulfillmentError> {
        let request = FulfillmentRequest::new(
            self.session.as_str(),
            query,
            self.language_code.as_str(),
            self.platform.as_str(),
        );

        let mut attempt = 0u32;
        let response = loop {
            match self.transport.post(&request).await {
                Ok(response) => break response,
                Err(TransportError::Body(reason)) => {
                    return Err(FulfillmentError::MalformedResponse(reason));
                }
                Err(e) if self.policy.should_retry(attempt) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fulfillment attempt failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(FulfillmentError::NetworkFailure {
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                }
            }
        };

        let result = response.query_result.ok_or_else(|| {
            FulfillmentError::MalformedResponse("response has no queryResult".to_string())
        })?;

        let reply = normalize_reply(&result);
        debug!(
            attempts = attempt + 1,
            kind = %reply.kind(),
            quick_replies = reply.quick_replies.len(),
            "Fulfillment reply normalized"
        );
        Ok(reply)
    }
}
