//! Conversation state owned by the controller.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::identity::ResolvedIdentity;
use crate::message::{Message, Sender};

/// Which persistence backend holds the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    RemoteStore,
    LocalSession,
}

impl BackendKind {
    /// Short status badge shown next to the assistant title.
    pub fn badge(&self) -> &'static str {
        match self {
            BackendKind::RemoteStore => "online DB",
            BackendKind::LocalSession => "DB",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::RemoteStore => write!(f, "remote_store"),
            BackendKind::LocalSession => write!(f, "local_session"),
        }
    }
}

/// Lifecycle phase of the conversation controller.
///
/// `Initializing -> Ready <-> Sending`. Input is accepted only in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Initializing,
    Ready,
    Sending,
}

impl Default for ConversationPhase {
    fn default() -> Self {
        ConversationPhase::Initializing
    }
}

/// Per-session conversation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub identity: Option<ResolvedIdentity>,
    pub backend_kind: Option<BackendKind>,
    pub messages: Vec<Message>,
    pub phase: ConversationPhase,
}

impl ConversationState {
    /// True while a fulfillment call is in flight.
    pub fn is_typing(&self) -> bool {
        self.phase == ConversationPhase::Sending
    }

    /// True once identity and backend are resolved.
    pub fn is_ready(&self) -> bool {
        self.phase != ConversationPhase::Initializing
    }

    /// Quick replies offered by the most recent bot message.
    pub fn quick_replies(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Bot)
            .map(|m| m.quick_replies.as_slice())
            .unwrap_or(&[])
    }
}
