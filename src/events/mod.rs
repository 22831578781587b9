//! Lifecycle topics and event payload shapes.
//!
//! # Published topics
//! - `AjaxStarted` → [`RequestEvent`] — before the transport call is dispatched
//! - `AjaxCompleted` → [`ResponseEvent`] — after the response arrives
//! - `ContinuationError` → the full continuation object, at minimum `{errors: [...]}`
//! - arbitrary application topics named by a continuation's `topic` field
//!
//! For every request, `AjaxStarted` is published strictly before its
//! `AjaxCompleted`, and at most one completion is published per request.
//! Field names are camelCase on the wire so subscribers see the same
//! shapes regardless of language.

use serde::{Deserialize, Serialize};

/// Topic published when a request starts, before any network latency.
pub const AJAX_STARTED: &str = "AjaxStarted";

/// Topic published when a request completes with a transport-level response.
pub const AJAX_COMPLETED: &str = "AjaxCompleted";

/// Topic published when a continuation carries a non-empty `errors` sequence.
pub const CONTINUATION_ERROR: &str = "ContinuationError";

/// Immutable snapshot published on [`AJAX_STARTED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    /// ID allocated for this request.
    pub correlation_id: String,

    /// HTTP method, e.g. "GET".
    pub method: String,

    /// Request URL as given by the caller.
    pub url: String,
}

/// Immutable snapshot published on [`AJAX_COMPLETED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    /// ID echoed back by the server. Empty when the server did not echo
    /// the correlation header (best-effort, non-fatal).
    pub correlation_id: String,

    /// HTTP status code of the response.
    pub status_code: u16,

    /// Raw response body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_event_wire_shape() {
        let event = RequestEvent {
            correlation_id: "abc".into(),
            method: "GET".into(),
            url: "/testing".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["correlationId"], "abc");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["url"], "/testing");
    }

    #[test]
    fn test_response_event_wire_shape() {
        let event = ResponseEvent {
            correlation_id: String::new(),
            status_code: 200,
            body: "{}".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["correlationId"], "");
        assert_eq!(value["statusCode"], 200);
    }
}
