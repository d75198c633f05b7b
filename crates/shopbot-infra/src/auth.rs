//! File-backed anonymous identity provider.
//!
//! An anonymous account is a JSON file `{uid, signed_in_at}` in the data
//! directory. Signing in anonymously creates it; later sessions resume it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopbot_core::identity::AuthProvider;
use shopbot_types::error::AuthError;

/// File name of the stored account inside the data directory.
pub const ACCOUNT_FILE: &str = "identity.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    uid: String,
    signed_in_at: DateTime<Utc>,
}

/// `AuthProvider` persisting one anonymous account on disk.
#[derive(Debug, Clone)]
pub struct FileAuthProvider {
    path: PathBuf,
}

impl FileAuthProvider {
    /// Provider storing its account under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(ACCOUNT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget the stored account. No-op when none exists.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

impl AuthProvider for FileAuthProvider {
    async fn current_user(&self) -> Result<Option<String>, AuthError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };

        let account: StoredAccount = serde_json::from_str(&content)
            .map_err(|e| AuthError::Storage(format!("invalid account file: {e}")))?;
        Ok(Some(account.uid))
    }

    async fn sign_in_anonymously(&self) -> Result<String, AuthError> {
        let account = StoredAccount {
            uid: Uuid::now_v7().to_string(),
            signed_in_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&account)
            .map_err(|e| AuthError::SignInRejected(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::SignInRejected(e.to_string()))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| AuthError::SignInRejected(e.to_string()))?;

        tracing::info!(uid = %account.uid, path = %self.path.display(), "Anonymous account created");
        Ok(account.uid)
    }
}
