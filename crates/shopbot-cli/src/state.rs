//! Application state wiring the adapters together.
//!
//! Controllers and clients are generic over the transport and sleeper ports;
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use shopbot_core::clock::{SystemClock, TokioSleeper};
use shopbot_core::controller::ConversationController;
use shopbot_core::fulfillment::FulfillmentClient;
use shopbot_core::persistence::{BoxDocumentStore, MemorySessionStorage};
use shopbot_infra::auth::FileAuthProvider;
use shopbot_infra::config::{database_url, load_app_config, resolve_data_dir};
use shopbot_infra::fulfillment::HttpFulfillmentTransport;
use shopbot_infra::sqlite::document_store::SqliteDocumentStore;
use shopbot_infra::sqlite::pool::DatabasePool;
use shopbot_types::config::AppConfig;

pub type ConcreteClient = FulfillmentClient<HttpFulfillmentTransport, TokioSleeper>;

pub type ConcreteController = ConversationController<HttpFulfillmentTransport, TokioSleeper>;

/// Shared application state.
pub struct AppState {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub auth: FileAuthProvider,
    /// `None` when the store is disabled or could not be opened.
    pub store: Option<Arc<BoxDocumentStore>>,
}

impl AppState {
    /// Load config and open the document store.
    ///
    /// A store that fails to open is logged and left out; conversations then
    /// run on session storage.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;

        let store = if config.store.enabled {
            match DatabasePool::new(&database_url(&data_dir, &config.store)).await {
                Ok(pool) => Some(Arc::new(BoxDocumentStore::new(SqliteDocumentStore::new(pool)))),
                Err(e) => {
                    tracing::warn!(error = %e, "Document store unavailable, using session storage");
                    None
                }
            }
        } else {
            tracing::debug!("Document store disabled in config");
            None
        };

        Ok(Self {
            auth: FileAuthProvider::new(&data_dir),
            config,
            data_dir,
            store,
        })
    }

    /// Fulfillment client over HTTPS with the configured retry policy.
    pub fn client(&self) -> anyhow::Result<ConcreteClient> {
        let transport = HttpFulfillmentTransport::new(&self.config.fulfillment)?;
        Ok(FulfillmentClient::new(
            transport,
            TokioSleeper,
            &self.config.fulfillment,
        ))
    }

    /// A fresh, unstarted controller with its own session storage.
    pub fn controller(&self) -> anyhow::Result<ConcreteController> {
        Ok(ConversationController::new(
            self.client()?,
            self.config.conversation.clone(),
            self.config.store.app_id.clone(),
            Arc::new(SystemClock),
            Arc::new(MemorySessionStorage::new()),
        ))
    }
}
