//! Continuation policy engine.
//!
//! # Responsibilities
//! - Parse a response body into a [`Continuation`]
//! - Evaluate an ordered table of (predicate, effect) policies
//! - Fire the side effects of every matching policy, once per response
//!
//! # Design Decisions
//! - Table-driven: built-ins are registered like any other policy, and
//!   extending the vocabulary never touches the dispatch loop
//! - Policies are independent; several may fire for one response
//! - A failing or panicking effect is logged and never aborts later
//!   policies in the table
//! - The engine holds no per-response state, so re-evaluating the same
//!   continuation produces the same effects

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

use crate::bus::EventBus;
use crate::events;
use crate::observability::metrics;
use crate::window::WindowService;

/// One entry of a continuation's `errors` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Human-readable error message.
    pub message: String,
}

/// Structured response payload carrying zero or more directive fields.
///
/// Every field is optional; absence means "policy does not apply", not
/// an error. Unrecognized fields in the body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    /// Refresh directive. Only the exact string `"true"` triggers a
    /// reload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,

    /// Redirect target.
    #[serde(
        default,
        rename = "navigatePage",
        skip_serializing_if = "Option::is_none"
    )]
    pub navigate_page: Option<String>,

    /// Application-level errors reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorEntry>>,

    /// Application topic to broadcast on the bus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Payload published verbatim under `topic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Continuation {
    /// Parse a raw response body. Returns `None` for bodies that are
    /// not a JSON object; the response still flows back to the caller,
    /// only policy evaluation is skipped.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str(body) {
            Ok(continuation) => Some(continuation),
            Err(error) => {
                tracing::trace!(%error, "response body is not a continuation");
                None
            }
        }
    }
}

/// Error produced by a policy effect.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The continuation could not be re-serialized for publishing.
    #[error("failed to serialize continuation: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Effect-specific failure.
    #[error("{0}")]
    Effect(String),
}

/// Capabilities a policy effect may call into.
pub struct PolicyContext {
    /// Bus for `ContinuationError` and application topics.
    pub bus: Arc<dyn EventBus>,

    /// Navigation/reload service.
    pub window: Arc<dyn WindowService>,
}

type Predicate = Box<dyn Fn(&Continuation) -> bool + Send + Sync>;
type Effect = Box<dyn Fn(&Continuation, &PolicyContext) -> Result<(), PolicyError> + Send + Sync>;

/// A (predicate, effect) pair evaluated against each continuation.
pub struct Policy {
    name: String,
    applies: Predicate,
    execute: Effect,
}

impl Policy {
    /// Define a policy. `name` labels log lines and metrics.
    pub fn new<P, E>(name: impl Into<String>, applies: P, execute: E) -> Self
    where
        P: Fn(&Continuation) -> bool + Send + Sync + 'static,
        E: Fn(&Continuation, &PolicyContext) -> Result<(), PolicyError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            applies: Box::new(applies),
            execute: Box::new(execute),
        }
    }

    /// Policy label.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered policy table. Evaluation runs one pass over the table, in
/// registration order, firing each matching policy at most once.
#[derive(Default)]
pub struct PolicyEngine {
    policies: Vec<Policy>,
}

impl PolicyEngine {
    /// Engine with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine preloaded with the built-in policies, in reference order:
    /// errors, topic/payload, refresh, navigate.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(error_policy());
        engine.register(payload_policy());
        engine.register(refresh_policy());
        engine.register(navigate_policy());
        engine
    }

    /// Append a policy to the table. Runs after everything registered
    /// before it.
    pub fn register(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Evaluate every policy against `continuation`, isolating failures
    /// per policy.
    pub fn evaluate(&self, continuation: &Continuation, ctx: &PolicyContext) {
        for policy in &self.policies {
            if !(policy.applies)(continuation) {
                continue;
            }
            tracing::debug!(policy = %policy.name, "continuation policy triggered");
            metrics::record_policy_triggered(&policy.name);

            let outcome = catch_unwind(AssertUnwindSafe(|| (policy.execute)(continuation, ctx)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::error!(policy = %policy.name, %error, "continuation policy effect failed");
                }
                Err(_) => {
                    tracing::error!(policy = %policy.name, "continuation policy effect panicked");
                }
            }
        }
    }
}

/// Built-in: non-empty `errors` publishes `ContinuationError` with the
/// full continuation.
fn error_policy() -> Policy {
    Policy::new(
        "error",
        |c| c.errors.as_ref().is_some_and(|errors| !errors.is_empty()),
        |c, ctx| {
            let payload = serde_json::to_value(c)?;
            ctx.bus.publish(events::CONTINUATION_ERROR, payload);
            Ok(())
        },
    )
}

/// Built-in: `topic` and `payload` both present publishes the payload
/// verbatim under the named topic.
fn payload_policy() -> Policy {
    Policy::new(
        "payload",
        |c| c.topic.is_some() && c.payload.is_some(),
        |c, ctx| {
            if let (Some(topic), Some(payload)) = (&c.topic, &c.payload) {
                ctx.bus.publish(topic, payload.clone());
            }
            Ok(())
        },
    )
}

/// Built-in: `refresh` equal to the exact string `"true"` reloads the
/// page. Any other value means "do not refresh".
fn refresh_policy() -> Policy {
    Policy::new(
        "refresh",
        |c| c.refresh.as_deref() == Some("true"),
        |_, ctx| {
            ctx.window.refresh();
            Ok(())
        },
    )
}

/// Built-in: non-empty `navigatePage` redirects to that URL.
fn navigate_policy() -> Policy {
    Policy::new(
        "navigate",
        |c| c.navigate_page.as_deref().is_some_and(|url| !url.is_empty()),
        |c, ctx| {
            if let Some(url) = &c.navigate_page {
                ctx.window.navigate_to(url);
            }
            Ok(())
        },
    )
}
