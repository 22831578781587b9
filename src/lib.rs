//! Client-side HTTP continuation layer.
//!
//! Sits between an application and its HTTP transport: every outgoing
//! request is tagged with a unique correlation ID, the ID is round-tripped
//! through transport headers so responses can be matched back to their
//! originating requests under concurrency, and response bodies are scanned
//! for a small continuation vocabulary (`errors`, `topic`/`payload`,
//! `refresh`, `navigatePage`) whose side effects fire exactly once per
//! response.
//!
//! # Architecture Overview
//!
//! ```text
//!  Application
//!      │ send(request)
//!      ▼
//!  ┌──────────────┐  X-Correlation-Id   ┌────────────┐
//!  │ interceptor  │────────────────────▶│ transport  │───▶ server
//!  │              │◀────────────────────│ (reqwest)  │◀─── server
//!  └──────┬───────┘   echoed header     └────────────┘
//!         │
//!         ├─▶ bus: AjaxStarted / AjaxCompleted
//!         │
//!         ▼
//!  ┌──────────────┐
//!  │ policy engine│──▶ bus: ContinuationError, app topics
//!  │ (ordered)    │──▶ window: refresh() / navigate_to(url)
//!  └──────────────┘
//! ```
//!
//! Cross-cutting concerns: `config` (capability selection at startup),
//! `observability` (tracing + metrics counters on the request path).

// Core subsystems
pub mod bus;
pub mod correlation;
pub mod events;
pub mod interceptor;
pub mod policy;
pub mod transport;
pub mod window;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use bus::{EventBus, EventBusExt, InMemoryBus, ShardedBus, Subscription};
pub use config::ContinuationsConfig;
pub use correlation::{CorrelationId, CorrelationIdGenerator, X_CORRELATION_ID};
pub use events::{RequestEvent, ResponseEvent};
pub use interceptor::{ContinuationClient, ContinuationClientBuilder};
pub use policy::{Continuation, Policy, PolicyEngine};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use window::{LoggingWindow, RecordingWindow, WindowService};
