use thiserror::Error;

/// Failure of a fulfillment call after retries, or an unusable response.
///
/// Never surfaced to the caller of `FulfillmentClient::send`; it is folded
/// into a TEXT reply via [`FulfillmentError::user_message`].
#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error("خطأ {last_error}: فشل الاتصال بالخادم بعد {attempts} محاولات.")]
    NetworkFailure { attempts: u32, last_error: String },

    #[error("تنسيق رد Webhook غير صالح.")]
    MalformedResponse(String),
}

impl FulfillmentError {
    /// Text of the TEXT reply shown in place of a bot answer.
    pub fn user_message(&self) -> String {
        format!("🛑 فشل الاتصال. الرسالة: {self}")
    }

    /// Whether the failure came from exhausting the retry schedule.
    pub fn is_network(&self) -> bool {
        matches!(self, FulfillmentError::NetworkFailure { .. })
    }
}

/// Failure of a single fulfillment HTTP attempt.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-success status.
    #[error("{status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response arrived but the body could not be decoded.
    #[error("invalid response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Status and connection failures are retried; body failures are not.
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::Body(_))
    }
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider unavailable")]
    Unavailable,

    #[error("sign-in rejected: {0}")]
    SignInRejected(String),

    #[error("identity storage error: {0}")]
    Storage(String),
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable")]
    Unavailable,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("write failed: {0}")]
    WriteFailure(String),

    #[error("read failed: {0}")]
    ReadFailure(String),

    #[error("could not decode field '{field}': {reason}")]
    DecodeFailure { field: String, reason: String },

    #[error("persistence backend unavailable")]
    Unavailable,
}
