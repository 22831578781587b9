//! Observability for the interception pipeline.
//!
//! # Data Flow
//! ```text
//! interceptor / bus / policy engine
//!     → tracing (structured log events, inline at call sites)
//!     → metrics.rs (counters; exposition is the host's concern)
//! ```
//!
//! # Design Decisions
//! - The library never installs a tracing subscriber or a metrics
//!   recorder; the host application (or a test harness) does
//! - Counter updates are cheap and unconditional; with no recorder
//!   installed they are no-ops

pub mod metrics;
