use serde::{Deserialize, Serialize};

use std::fmt;

/// Identity used when no remote identity provider is configured.
pub const LOCAL_IDENTITY_ID: &str = "session-user";

/// Whether the conversation owner is backed by the remote identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    Remote,
    Local,
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityMode::Remote => write!(f, "remote"),
            IdentityMode::Local => write!(f, "local"),
        }
    }
}

/// The resolved owner of the current conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub id: String,
    pub mode: IdentityMode,
}

impl ResolvedIdentity {
    /// The fixed anonymous local identity.
    pub fn local() -> Self {
        Self {
            id: LOCAL_IDENTITY_ID.to_string(),
            mode: IdentityMode::Local,
        }
    }

    pub fn remote(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: IdentityMode::Remote,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.mode == IdentityMode::Remote
    }
}
