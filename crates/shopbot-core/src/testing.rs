//! Test doubles for the port traits.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;

use shopbot_types::document::{MessageDocument, StoredDocument};
use shopbot_types::error::{AuthError, StoreError, TransportError};
use shopbot_types::fulfillment::{
    FulfillmentMessage, FulfillmentRequest, FulfillmentResponse, QueryResult, QuickRepliesEntry,
};

use crate::clock::{Clock, Sleeper};
use crate::fulfillment::FulfillmentTransport;
use crate::identity::AuthProvider;
use crate::persistence::{CollectionChange, DocumentStore};

/// A response with `fulfillmentText` and optional quick replies.
pub fn text_response(text: &str, quick_replies: &[&str]) -> FulfillmentResponse {
    let mut messages = Vec::new();
    if !quick_replies.is_empty() {
        messages.push(FulfillmentMessage {
            quick_replies: Some(QuickRepliesEntry {
                quick_replies: quick_replies.iter().map(|s| s.to_string()).collect(),
            }),
            ..Default::default()
        });
    }
    FulfillmentResponse {
        query_result: Some(QueryResult {
            fulfillment_text: Some(text.to_string()),
            fulfillment_messages: messages,
        }),
    }
}

// ---------------------------------------------------------------------------
// Clock / Sleeper
// ---------------------------------------------------------------------------

/// Clock returning a settable instant.
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Transport replaying a script, then a fallback outcome forever.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<FulfillmentResponse, TransportError>>>>,
    fallback: Result<FulfillmentResponse, TransportError>,
    requests: Arc<Mutex<Vec<FulfillmentRequest>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<FulfillmentResponse, TransportError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: Ok(text_response("fallback", &[])),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every attempt with `error`.
    pub fn always(error: TransportError) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback = Err(error);
        transport
    }

    /// Answer every attempt with `response`.
    pub fn replying(response: FulfillmentResponse) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback = Ok(response);
        transport
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query_text().to_string())
            .collect()
    }

    pub fn last_request(&self) -> Option<FulfillmentRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl FulfillmentTransport for ScriptedTransport {
    async fn post(&self, request: &FulfillmentRequest) -> Result<FulfillmentResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

// ---------------------------------------------------------------------------
// Identity provider
// ---------------------------------------------------------------------------

pub struct MockAuthProvider {
    current: Result<Option<String>, ()>,
    sign_in: Result<String, ()>,
    sign_in_calls: AtomicUsize,
}

impl MockAuthProvider {
    pub fn signed_in(uid: &str) -> Self {
        Self {
            current: Ok(Some(uid.to_string())),
            sign_in: Err(()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn anonymous(uid: &str) -> Self {
        Self {
            current: Ok(None),
            sign_in: Ok(uid.to_string()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            current: Ok(None),
            sign_in: Err(()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn unreadable(uid: &str) -> Self {
        Self {
            current: Err(()),
            sign_in: Ok(uid.to_string()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

impl AuthProvider for MockAuthProvider {
    async fn current_user(&self) -> Result<Option<String>, AuthError> {
        self.current
            .clone()
            .map_err(|_| AuthError::Storage("unreadable".to_string()))
    }

    async fn sign_in_anonymously(&self) -> Result<String, AuthError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in
            .clone()
            .map_err(|_| AuthError::SignInRejected("disabled".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// In-memory document store. Clones share documents, availability and the
/// change feed.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    collections: Arc<Mutex<BTreeMap<String, BTreeMap<String, MessageDocument>>>>,
    available: Arc<AtomicBool>,
    changes: broadcast::Sender<CollectionChange>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            collections: Arc::new(Mutex::new(BTreeMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            changes,
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &MessageDocument,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        let _ = self.changes.send(CollectionChange {
            collection: collection.to_string(),
            document_id: id.to_string(),
        });
        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.check()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, document)| StoredDocument {
                        id: id.clone(),
                        document: document.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn watch(&self) -> Result<broadcast::Receiver<CollectionChange>, StoreError> {
        self.check()?;
        Ok(self.changes.subscribe())
    }
}
