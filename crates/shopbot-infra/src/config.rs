//! Configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.shopbot/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use shopbot_types::config::{AppConfig, StoreConfig};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SHOPBOT_DATA_DIR";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `SHOPBOT_DATA_DIR` environment variable
/// 2. `~/.shopbot`
/// 3. `.shopbot` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".shopbot");
    }

    PathBuf::from(".shopbot")
}

/// SQLite URL of the document store database inside `data_dir`.
pub fn database_url(data_dir: &Path, store: &StoreConfig) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join(&store.database_file).display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.fulfillment.max_retries, 3);
        assert!(config.store.enabled);
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[fulfillment]
endpoint_url = "http://127.0.0.1:9000/webhook"
base_delay_ms = 10

[conversation]
greeting_query = "hello"
greeting_quick_replies = ["Catalog"]

[store]
app_id = "storefront-eg"
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.fulfillment.endpoint_url, "http://127.0.0.1:9000/webhook");
        assert_eq!(config.fulfillment.base_delay_ms, 10);
        assert_eq!(config.conversation.greeting_query, "hello");
        assert_eq!(config.conversation.greeting_quick_replies, vec!["Catalog"]);
        assert_eq!(config.store.app_id, "storefront-eg");
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.conversation.greeting_query, "مرحبا");
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/shop"), &StoreConfig::default());
        assert_eq!(url, "sqlite:///tmp/shop/shopbot.db?mode=rwc");
    }
}
