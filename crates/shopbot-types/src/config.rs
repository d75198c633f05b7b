//! Configuration types for the storefront assistant.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field has
//! a default, so an empty or missing file yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Fulfillment endpoint and retry schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Fixed session/channel identifier sent with every query.
    #[serde(default = "default_session")]
    pub session: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Additional attempts after the first failed one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff base: attempt `n` waits `2^n * base_delay_ms`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for a single HTTP attempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "https://gifts-bot-webhook.vercel.app/webhook".to_string()
}

fn default_session() -> String {
    "projects/gifts-bot/agent/custom-session-id-123".to_string()
}

fn default_language_code() -> String {
    "ar-EG".to_string()
}

fn default_platform() -> String {
    "CUSTOM_REACT_UI".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            session: default_session(),
            language_code: default_language_code(),
            platform: default_platform(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Conversation behaviour: greeting and contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Query sent once when a conversation starts with an empty log.
    #[serde(default = "default_greeting_query")]
    pub greeting_query: String,
    /// Offered when the greeting reply carries no quick replies.
    #[serde(default = "default_greeting_quick_replies")]
    pub greeting_quick_replies: Vec<String>,
    /// Messaging-app number used by purchase and contact links.
    #[serde(default = "default_contact_number")]
    pub contact_number: String,
}

fn default_greeting_query() -> String {
    "مرحبا".to_string()
}

fn default_greeting_quick_replies() -> Vec<String> {
    vec!["عرض الأقسام".to_string(), "أفضل التوصيات".to_string()]
}

fn default_contact_number() -> String {
    "201013080898".to_string()
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            greeting_query: default_greeting_query(),
            greeting_quick_replies: default_greeting_quick_replies(),
            contact_number: default_contact_number(),
        }
    }
}

/// Remote document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// When false the assistant runs on session storage only.
    #[serde(default = "default_store_enabled")]
    pub enabled: bool,
    /// Application instance id namespacing identities in the store.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// Database file name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_store_enabled() -> bool {
    true
}

fn default_app_id() -> String {
    "shopbot".to_string()
}

fn default_database_file() -> String {
    "shopbot.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_store_enabled(),
            app_id: default_app_id(),
            database_file: default_database_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.fulfillment.max_retries, 3);
        assert_eq!(config.fulfillment.base_delay_ms, 1000);
        assert_eq!(config.fulfillment.language_code, "ar-EG");
        assert_eq!(config.conversation.greeting_query, "مرحبا");
        assert_eq!(config.conversation.greeting_quick_replies.len(), 2);
        assert!(config.store.enabled);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.fulfillment.platform, "CUSTOM_REACT_UI");
        assert_eq!(config.store.database_file, "shopbot.db");
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
[fulfillment]
endpoint_url = "http://localhost:8080/webhook"
max_retries = 1

[store]
enabled = false
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.fulfillment.endpoint_url, "http://localhost:8080/webhook");
        assert_eq!(config.fulfillment.max_retries, 1);
        assert_eq!(config.fulfillment.base_delay_ms, 1000);
        assert!(!config.store.enabled);
        assert_eq!(config.store.app_id, "shopbot");
        assert_eq!(config.conversation.contact_number, "201013080898");
    }
}
