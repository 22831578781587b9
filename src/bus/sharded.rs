//! DashMap-backed bus backend.
//!
//! Shards the topic registry so publishes on unrelated topics never
//! contend on one lock. Behaviorally interchangeable with
//! [`InMemoryBus`](super::InMemoryBus): insertion-order delivery,
//! snapshot dispatch, per-subscriber isolation.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{deliver, EventBus, Handler, Subscription};

struct Entry {
    id: u64,
    handler: Handler,
}

/// Sharded in-memory [`EventBus`] for subscriber-heavy hosts.
#[derive(Default)]
pub struct ShardedBus {
    topics: DashMap<String, Vec<Entry>>,
    next_id: AtomicU64,
}

impl ShardedBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscribers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |entries| entries.len())
    }
}

impl EventBus for ShardedBus {
    fn publish(&self, topic: &str, payload: Value) {
        // The shard guard must be dropped before invoking handlers;
        // a re-entrant subscribe on the same topic would deadlock on it.
        let snapshot: Vec<Handler> = match self.topics.get(topic) {
            Some(entries) => entries.iter().map(|e| Arc::clone(&e.handler)).collect(),
            None => return,
        };

        tracing::trace!(topic, subscribers = snapshot.len(), "publishing event");
        for handler in &snapshot {
            deliver(topic, handler, &payload);
        }
    }

    fn subscribe(&self, topic: &str, handler: Handler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics
            .entry(topic.to_string())
            .or_default()
            .push(Entry { id, handler });
        Subscription::new(topic, id)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        if let Some(mut entries) = self.topics.get_mut(subscription.topic()) {
            entries.retain(|e| e.id != subscription.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBusExt;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_delivers_in_insertion_order() {
        let bus = ShardedBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            bus.subscribe_fn("topic", move |_| order.lock().unwrap().push(tag));
        }

        bus.publish("topic", json!(1));
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = ShardedBus::new();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let subscription = bus.subscribe_fn("topic", move |_| *counter.lock().unwrap() += 1);

        bus.publish("topic", Value::Null);
        bus.unsubscribe(&subscription);
        bus.publish("topic", Value::Null);

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = ShardedBus::new();
        let reached = Arc::new(Mutex::new(false));

        bus.subscribe_fn("topic", |_| panic!("boom"));
        let flag = Arc::clone(&reached);
        bus.subscribe_fn("topic", move |_| *flag.lock().unwrap() = true);

        bus.publish("topic", Value::Null);
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn test_topics_are_independent() {
        let bus = ShardedBus::new();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        bus.subscribe_fn("one", move |_| *counter.lock().unwrap() += 1);

        bus.publish("two", Value::Null);
        assert_eq!(*count.lock().unwrap(), 0);
        bus.publish("one", Value::Null);
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
