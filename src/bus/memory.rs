//! Default in-memory bus backend.
//!
//! A single `RwLock` over the topic registry. Publish takes a snapshot
//! of the topic's handlers under the read lock and releases it before
//! invoking any of them, so handlers are free to subscribe or
//! unsubscribe re-entrantly.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{deliver, EventBus, Handler, Subscription};

struct Entry {
    id: u64,
    handler: Handler,
}

/// Lock-based in-memory [`EventBus`]. The default backend.
#[derive(Default)]
pub struct InMemoryBus {
    topics: RwLock<HashMap<String, Vec<Entry>>>,
    next_id: AtomicU64,
}

impl InMemoryBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscribers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.topics.read().expect("bus registry lock poisoned");
        topics.get(topic).map_or(0, Vec::len)
    }
}

impl EventBus for InMemoryBus {
    fn publish(&self, topic: &str, payload: Value) {
        let snapshot: Vec<Handler> = {
            let topics = self.topics.read().expect("bus registry lock poisoned");
            match topics.get(topic) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.handler)).collect(),
                None => return,
            }
        };

        tracing::trace!(topic, subscribers = snapshot.len(), "publishing event");
        for handler in &snapshot {
            deliver(topic, handler, &payload);
        }
    }

    fn subscribe(&self, topic: &str, handler: Handler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut topics = self.topics.write().expect("bus registry lock poisoned");
        topics
            .entry(topic.to_string())
            .or_default()
            .push(Entry { id, handler });
        Subscription::new(topic, id)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        let mut topics = self.topics.write().expect("bus registry lock poisoned");
        if let Some(entries) = topics.get_mut(subscription.topic()) {
            entries.retain(|e| e.id != subscription.id());
        }
    }
}
