//! Publish/subscribe event bus abstraction.
//!
//! # Data Flow
//! ```text
//! publisher ──publish(topic, payload)──▶ backend registry
//!                                            │ snapshot of subscribers
//!                                            ▼
//!                              handler, handler, ... (insertion order)
//! ```
//!
//! # Design Decisions
//! - Callers code only against the three-method [`EventBus`] capability;
//!   the concrete backend is chosen once at configuration time
//! - Delivery is synchronous fan-out over a snapshot taken at publish
//!   time, so re-entrant subscribe/unsubscribe cannot corrupt an
//!   in-progress delivery
//! - A panicking subscriber is isolated: caught, logged, counted, and
//!   remaining subscribers still receive the event
//! - A process-wide bus can be installed explicitly; there is no
//!   ambient fallback and no implicit teardown

pub mod memory;
pub mod sharded;

pub use memory::InMemoryBus;
pub use sharded::ShardedBus;

use arc_swap::ArcSwapOption;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::observability::metrics;

/// Subscriber callback. Receives a borrowed payload; must not assume
/// it is the only recipient.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    topic: String,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(topic: impl Into<String>, id: u64) -> Self {
        Self {
            topic: topic.into(),
            id,
        }
    }

    /// Topic this subscription is attached to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

/// Minimal pub/sub capability. Backends are swappable at configuration
/// time without changing callers.
pub trait EventBus: Send + Sync {
    /// Deliver `payload` to every current subscriber of `topic`, in
    /// insertion order. Fire-and-forget: zero subscribers is not an
    /// error, and a failing subscriber never propagates to the
    /// publisher or to sibling subscribers.
    fn publish(&self, topic: &str, payload: Value);

    /// Register a handler for `topic`. Multiple subscribers per topic
    /// are allowed.
    fn subscribe(&self, topic: &str, handler: Handler) -> Subscription;

    /// Remove a previously registered handler. Unknown handles are a
    /// no-op.
    fn unsubscribe(&self, subscription: &Subscription);
}

/// Closure-friendly extensions over [`EventBus`].
pub trait EventBusExt: EventBus {
    /// Subscribe with a plain closure.
    fn subscribe_fn<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.subscribe(topic, Arc::new(handler))
    }
}

impl<B: EventBus + ?Sized> EventBusExt for B {}

/// Invoke one subscriber, containing any panic so delivery to the rest
/// of the snapshot continues.
pub(crate) fn deliver(topic: &str, handler: &Handler, payload: &Value) {
    if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
        metrics::record_subscriber_panic(topic);
        tracing::error!(topic, "event subscriber panicked; continuing delivery");
    }
}

struct InstalledBus {
    bus: Arc<dyn EventBus>,
}

static GLOBAL_BUS: ArcSwapOption<InstalledBus> = ArcSwapOption::const_empty();

/// Install the process-wide bus. Must be called before any code relies
/// on [`global`]; later calls replace the previous bus for new lookups.
pub fn install(bus: Arc<dyn EventBus>) {
    GLOBAL_BUS.store(Some(Arc::new(InstalledBus { bus })));
}

/// The currently installed process-wide bus, if any.
pub fn global() -> Option<Arc<dyn EventBus>> {
    GLOBAL_BUS.load_full().map(|installed| Arc::clone(&installed.bus))
}
