//! Conversation controller.
//!
//! Owns the conversation state and drives the lifecycle
//! `Initializing -> Ready <-> Sending`:
//!
//! 1. `start` resolves the identity, selects the persistence backend, opens
//!    the history subscription and loads the first snapshot, then greets if
//!    the log is empty.
//! 2. `submit` appends the user message, calls the fulfillment service and
//!    appends the bot reply, in that order.
//! 3. `sync` / `next_update` apply snapshots pushed by the remote store,
//!    replacing the log wholesale.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shopbot_types::config::ConversationConfig;
use shopbot_types::conversation::{BackendKind, ConversationPhase, ConversationState};
use shopbot_types::identity::ResolvedIdentity;
use shopbot_types::message::Message;

use crate::clock::{Clock, Sleeper};
use crate::fulfillment::{FulfillmentClient, FulfillmentTransport};
use crate::identity::{AuthProvider, SessionIdentity};
use crate::persistence::{
    BoxDocumentStore, HistorySubscription, LocalSessionBackend, PersistenceBackend,
    RemoteStoreBackend, SessionStorage,
};

/// Drives one conversation from startup through user turns.
pub struct ConversationController<T: FulfillmentTransport, S: Sleeper> {
    client: FulfillmentClient<T, S>,
    config: ConversationConfig,
    app_id: String,
    clock: Arc<dyn Clock>,
    session_storage: Arc<dyn SessionStorage>,
    backend: Option<PersistenceBackend>,
    /// Session mirror used when remote writes fail.
    fallback: Option<LocalSessionBackend>,
    subscription: Option<HistorySubscription>,
    state: ConversationState,
    greeted: bool,
    last_timestamp: i64,
}

impl<T: FulfillmentTransport, S: Sleeper> ConversationController<T, S> {
    pub fn new(
        client: FulfillmentClient<T, S>,
        config: ConversationConfig,
        app_id: impl Into<String>,
        clock: Arc<dyn Clock>,
        session_storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            client,
            config,
            app_id: app_id.into(),
            clock,
            session_storage,
            backend: None,
            fallback: None,
            subscription: None,
            state: ConversationState::default(),
            greeted: false,
            last_timestamp: 0,
        }
    }

    /// Resolve identity, select the backend, load history, and greet.
    ///
    /// The remote store is used only when the identity is remote and a store
    /// is configured. Calling `start` on a started controller does nothing.
    pub async fn start<A: AuthProvider>(
        &mut self,
        auth: Option<&A>,
        store: Option<Arc<BoxDocumentStore>>,
    ) {
        if self.state.phase != ConversationPhase::Initializing {
            return;
        }

        let identity = SessionIdentity::resolve(auth).await;
        let backend = match store {
            Some(store) if identity.is_remote() => PersistenceBackend::Remote(
                RemoteStoreBackend::new(store, &self.app_id, &identity.id, self.clock.clone()),
            ),
            _ => PersistenceBackend::Local(LocalSessionBackend::open(self.session_storage.clone())),
        };
        let kind = backend.kind();
        info!(identity = %identity.id, mode = %identity.mode, backend = %kind, "Conversation starting");

        match backend.subscribe() {
            Ok(mut subscription) => {
                match subscription.next_snapshot().await {
                    Some(Ok(messages)) => self.replace_log(messages),
                    Some(Err(e)) => warn!(error = %e, "Initial history load failed"),
                    None => {}
                }
                self.subscription = Some(subscription);
            }
            Err(e) => warn!(error = %e, "Could not subscribe to history"),
        }

        self.state.identity = Some(identity);
        self.state.backend_kind = Some(kind);
        self.backend = Some(backend);
        self.state.phase = ConversationPhase::Ready;

        if self.state.messages.is_empty() && !self.greeted {
            self.greet().await;
        }
    }

    /// Submit user input. Returns whether it was accepted.
    ///
    /// Input is ignored unless the controller is ready and the trimmed text is
    /// non-empty.
    pub async fn submit(&mut self, input: &str) -> bool {
        let query = input.trim();
        if self.state.phase != ConversationPhase::Ready || query.is_empty() {
            return false;
        }

        let user_message = Message::user(query, self.next_timestamp());
        self.append(user_message).await;

        self.state.phase = ConversationPhase::Sending;
        let reply = self.client.send(query).await;
        self.state.phase = ConversationPhase::Ready;

        let bot_message = Message::bot(reply, self.next_timestamp());
        self.append(bot_message).await;
        true
    }

    /// Submit the quick reply at `index` of the latest bot message.
    pub async fn select_quick_reply(&mut self, index: usize) -> bool {
        match self.state.quick_replies().get(index).cloned() {
            Some(reply) => self.submit(&reply).await,
            None => false,
        }
    }

    /// Apply pending remote snapshots without waiting. Returns whether the
    /// log was replaced.
    pub async fn sync(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let mut replaced = None;
        while let Some(snapshot) = subscription.poll_snapshot().await {
            match snapshot {
                Ok(messages) => replaced = Some(messages),
                Err(e) => warn!(error = %e, "History refresh failed"),
            }
        }
        match replaced {
            Some(messages) => {
                self.replace_log(messages);
                true
            }
            None => false,
        }
    }

    /// Wait for the next remote snapshot and apply it. Returns `false` once
    /// the subscription has ended.
    pub async fn next_update(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next_snapshot().await {
            Some(Ok(messages)) => {
                self.replace_log(messages);
                true
            }
            Some(Err(e)) => {
                warn!(error = %e, "History refresh failed");
                true
            }
            None => false,
        }
    }

    /// Close the history subscription.
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn quick_replies(&self) -> &[String] {
        self.state.quick_replies()
    }

    pub fn identity(&self) -> Option<&ResolvedIdentity> {
        self.state.identity.as_ref()
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.state.backend_kind
    }

    pub fn is_typing(&self) -> bool {
        self.state.is_typing()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn client(&self) -> &FulfillmentClient<T, S> {
        &self.client
    }

    async fn greet(&mut self) {
        self.greeted = true;
        self.state.phase = ConversationPhase::Sending;
        let mut reply = self.client.send(&self.config.greeting_query).await;
        self.state.phase = ConversationPhase::Ready;

        if reply.quick_replies.is_empty() {
            reply.quick_replies = self.config.greeting_quick_replies.clone();
        }
        let message = Message::bot(reply, self.next_timestamp());
        self.append(message).await;
        debug!("Greeting sent");
    }

    /// Persist `message` and apply it to the in-memory log.
    ///
    /// A failed remote write keeps the message in memory and mirrors the
    /// whole log to session storage; the remote write is not retried.
    async fn append(&mut self, message: Message) {
        let result = match self.backend.as_mut() {
            Some(backend) => backend.append(&message).await,
            None => Ok(()),
        };
        self.state.messages.push(message);

        if let Err(e) = result {
            warn!(error = %e, "Append failed, mirroring log to session storage");
            let storage = self.session_storage.clone();
            let fallback = self
                .fallback
                .get_or_insert_with(|| LocalSessionBackend::open(storage));
            if let Err(e) = fallback.replace_all(&self.state.messages) {
                warn!(error = %e, "Session mirror failed");
            }
        }
    }

    fn replace_log(&mut self, messages: Vec<Message>) {
        if let Some(last) = messages.iter().map(|m| m.timestamp).max() {
            self.last_timestamp = self.last_timestamp.max(last);
        }
        self.state.messages = messages;
    }

    /// Strictly increasing ordering key for messages created here.
    fn next_timestamp(&mut self) -> i64 {
        let now = self.clock.now_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }
}
