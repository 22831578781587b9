//! Metrics collection.
//!
//! # Metrics
//! - `continuations_requests_started_total` (counter): by method
//! - `continuations_requests_completed_total` (counter): by status
//! - `continuations_transport_failures_total` (counter)
//! - `continuations_policies_triggered_total` (counter): by policy
//! - `continuations_subscriber_panics_total` (counter): by topic

use metrics::counter;

/// Record an outgoing request, before dispatch.
pub fn record_request_started(method: &str) {
    counter!("continuations_requests_started_total", "method" => method.to_string()).increment(1);
}

/// Record a completed request.
pub fn record_request_completed(status: u16) {
    counter!("continuations_requests_completed_total", "status" => status.to_string()).increment(1);
}

/// Record a transport-level failure (no response arrived).
pub fn record_transport_failure() {
    counter!("continuations_transport_failures_total").increment(1);
}

/// Record a continuation policy firing.
pub fn record_policy_triggered(policy: &str) {
    counter!("continuations_policies_triggered_total", "policy" => policy.to_string()).increment(1);
}

/// Record a subscriber panic contained by the bus.
pub fn record_subscriber_panic(topic: &str) {
    counter!("continuations_subscriber_panics_total", "topic" => topic.to_string()).increment(1);
}
