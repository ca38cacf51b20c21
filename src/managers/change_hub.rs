//! Change Hub.
//!
//! Per-kind registry of change-notification subscribers. Each subscription owns
//! an unbounded tokio channel; detaching is idempotent and receivers that were
//! dropped are pruned on the next publish.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::types::bookmark::{ChangeEvent, ChangeKind};

/// A live subscription to one kind of change notification.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub kind: ChangeKind,
    pub receiver: UnboundedReceiver<ChangeEvent>,
}

type Senders = Vec<(Uuid, UnboundedSender<ChangeEvent>)>;

/// Fan-out of change events to subscribers, keyed by event kind.
#[derive(Default)]
pub struct ChangeHub {
    subscribers: Mutex<HashMap<ChangeKind, Senders>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ChangeKind, Senders>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a new subscriber for `kind`.
    pub fn subscribe(&self, kind: ChangeKind) -> Subscription {
        let (tx, rx) = unbounded_channel();
        let id = Uuid::new_v4();
        self.lock().entry(kind).or_default().push((id, tx));
        Subscription {
            id,
            kind,
            receiver: rx,
        }
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        let mut subscribers = self.lock();
        let mut removed = false;
        for senders in subscribers.values_mut() {
            let before = senders.len();
            senders.retain(|(sid, _)| *sid != id);
            removed |= senders.len() != before;
        }
        removed
    }

    /// Delivers an event to every subscriber of its kind. Returns the number reached.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let mut subscribers = self.lock();
        let Some(senders) = subscribers.get_mut(&event.kind()) else {
            return 0;
        };
        senders.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        senders.len()
    }

    pub fn subscriber_count(&self, kind: ChangeKind) -> usize {
        self.lock().get(&kind).map(Vec::len).unwrap_or(0)
    }
}
