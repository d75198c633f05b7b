//! Session identity resolution.
//!
//! The conversation owner is either an identity issued by the remote
//! provider or the fixed local identity used when no provider is configured.

use tracing::{info, warn};
use uuid::Uuid;

use shopbot_types::error::AuthError;
use shopbot_types::identity::ResolvedIdentity;

/// Identity provider port.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in shopbot-infra (e.g., `FileAuthProvider`).
pub trait AuthProvider: Send + Sync {
    /// The currently signed-in identity, if any.
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<String>, AuthError>> + Send;

    /// Create an anonymous identity and return its id.
    fn sign_in_anonymously(
        &self,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;
}

/// Resolves the conversation owner once per controller lifecycle.
pub struct SessionIdentity;

impl SessionIdentity {
    /// Resolve the identity for this session.
    ///
    /// Without a provider the local identity is returned immediately. A
    /// failing read of the current identity counts as "none". A rejected
    /// anonymous sign-in falls back to a random id that still runs in remote
    /// mode.
    pub async fn resolve<A: AuthProvider>(provider: Option<&A>) -> ResolvedIdentity {
        let Some(provider) = provider else {
            info!("No identity provider configured, using local identity");
            return ResolvedIdentity::local();
        };

        let current = match provider.current_user().await {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "Failed to read current identity");
                None
            }
        };

        if let Some(uid) = current {
            info!(uid = %uid, "Resumed existing identity");
            return ResolvedIdentity::remote(uid);
        }

        match provider.sign_in_anonymously().await {
            Ok(uid) => {
                info!(uid = %uid, "Signed in anonymously");
                ResolvedIdentity::remote(uid)
            }
            Err(e) => {
                let uid = Uuid::now_v7().to_string();
                warn!(error = %e, uid = %uid, "Anonymous sign-in failed, using random identity");
                ResolvedIdentity::remote(uid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAuthProvider;
    use shopbot_types::identity::IdentityMode;

    #[tokio::test]
    async fn test_no_provider_resolves_local() {
        let identity = SessionIdentity::resolve::<MockAuthProvider>(None).await;
        assert_eq!(identity, ResolvedIdentity::local());
    }

    #[tokio::test]
    async fn test_existing_user_is_reused() {
        let provider = MockAuthProvider::signed_in("uid-1");
        let identity = SessionIdentity::resolve(Some(&provider)).await;
        assert_eq!(identity, ResolvedIdentity::remote("uid-1"));
        assert_eq!(provider.sign_in_calls(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_sign_in_when_no_user() {
        let provider = MockAuthProvider::anonymous("anon-7");
        let identity = SessionIdentity::resolve(Some(&provider)).await;
        assert_eq!(identity, ResolvedIdentity::remote("anon-7"));
        assert_eq!(provider.sign_in_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_sign_in_uses_random_remote_id() {
        let provider = MockAuthProvider::rejecting();
        let identity = SessionIdentity::resolve(Some(&provider)).await;
        assert_eq!(identity.mode, IdentityMode::Remote);
        assert!(Uuid::parse_str(&identity.id).is_ok());
    }

    #[tokio::test]
    async fn test_unreadable_current_user_counts_as_none() {
        let provider = MockAuthProvider::unreadable("anon-2");
        let identity = SessionIdentity::resolve(Some(&provider)).await;
        assert_eq!(identity.id, "anon-2");
        assert_eq!(provider.sign_in_calls(), 1);
    }
}
