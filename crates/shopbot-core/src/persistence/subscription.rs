//! History subscriptions.
//!
//! A remote subscription yields a full, sorted snapshot first and then one
//! per change to its collection. A local subscription yields the loaded log
//! once. Dropping the subscription (or calling `unsubscribe`) ends it.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

use shopbot_types::error::PersistenceError;
use shopbot_types::message::Message;

use super::document_store::CollectionChange;
use super::remote::RemoteStoreBackend;

pub type Snapshot = Result<Vec<Message>, PersistenceError>;

pub struct HistorySubscription {
    source: Source,
}

enum Source {
    Remote {
        reader: RemoteStoreBackend,
        changes: broadcast::Receiver<CollectionChange>,
        primed: bool,
    },
    Local {
        snapshot: Option<Vec<Message>>,
    },
}

impl HistorySubscription {
    pub(crate) fn remote(
        reader: RemoteStoreBackend,
        changes: broadcast::Receiver<CollectionChange>,
    ) -> Self {
        Self {
            source: Source::Remote {
                reader,
                changes,
                primed: false,
            },
        }
    }

    pub(crate) fn local(snapshot: Vec<Message>) -> Self {
        Self {
            source: Source::Local {
                snapshot: Some(snapshot),
            },
        }
    }

    /// Wait for the next snapshot. `None` once the subscription is exhausted.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        match &mut self.source {
            Source::Local { snapshot } => snapshot.take().map(Ok),
            Source::Remote {
                reader,
                changes,
                primed,
            } => {
                if !*primed {
                    *primed = true;
                    return Some(reader.load().await);
                }
                loop {
                    match changes.recv().await {
                        Ok(change) if change.collection == reader.collection() => {
                            return Some(reader.load().await);
                        }
                        Ok(_) => continue,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Change feed lagged, re-reading collection");
                            return Some(reader.load().await);
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
        }
    }

    /// Return a snapshot if changes are pending, without waiting.
    ///
    /// Any number of pending changes collapse into one re-read.
    pub async fn poll_snapshot(&mut self) -> Option<Snapshot> {
        match &mut self.source {
            Source::Local { snapshot } => snapshot.take().map(Ok),
            Source::Remote {
                reader,
                changes,
                primed,
            } => {
                if !*primed {
                    *primed = true;
                    return Some(reader.load().await);
                }
                let mut dirty = false;
                loop {
                    match changes.try_recv() {
                        Ok(change) => dirty |= change.collection == reader.collection(),
                        Err(TryRecvError::Lagged(_)) => dirty = true,
                        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                    }
                }
                if dirty {
                    Some(reader.load().await)
                } else {
                    None
                }
            }
        }
    }

    /// End the subscription.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for HistorySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.source {
            Source::Remote { .. } => "remote",
            Source::Local { .. } => "local",
        };
        f.debug_struct("HistorySubscription")
            .field("source", &kind)
            .finish()
    }
}
