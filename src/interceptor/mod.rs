//! Request interceptor.
//!
//! # Responsibilities
//! - Allocate a correlation ID and attach it to the outgoing header
//! - Publish `AjaxStarted` before the transport call is dispatched
//! - Read the echoed correlation header off the response
//! - Publish `AjaxCompleted`, then hand the body to the policy engine
//!
//! # Design Decisions
//! - `AjaxStarted` is published synchronously before the transport
//!   future is awaited, so subscribers (e.g. spinners) run before any
//!   network latency
//! - Transport failure returns `Err` to the caller and publishes no
//!   completion; continuation policies never see failed transports
//! - A missing correlation echo yields an empty `correlationId` on the
//!   completion event rather than failing the pipeline

use std::sync::Arc;

use serde::Serialize;

use crate::bus::{self, EventBus, InMemoryBus};
use crate::config::ContinuationsConfig;
use crate::correlation::{CorrelationIdGenerator, X_CORRELATION_ID};
use crate::events::{self, RequestEvent, ResponseEvent};
use crate::observability::metrics;
use crate::policy::{Continuation, Policy, PolicyContext, PolicyEngine};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
use crate::window::{LoggingWindow, WindowService};

/// Correlation + continuation-dispatch client wrapping an HTTP
/// transport. All capabilities are injected at construction and fixed
/// for the client's lifetime.
pub struct ContinuationClient {
    transport: Arc<dyn Transport>,
    bus: Arc<dyn EventBus>,
    window: Arc<dyn WindowService>,
    engine: PolicyEngine,
    ids: CorrelationIdGenerator,
    header_name: String,
}

impl ContinuationClient {
    /// Start building a client.
    pub fn builder() -> ContinuationClientBuilder {
        ContinuationClientBuilder::new()
    }

    /// Client with every capability at its default: reqwest transport,
    /// fresh in-memory bus (or the installed process-wide bus), logging
    /// window, built-in policies.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Wire a client from configuration: bus backend, transport
    /// timeout, and correlation header name are all chosen here, once.
    pub fn from_config(config: &ContinuationsConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::with_timeout(config.transport.timeout())?;
        Ok(Self::builder()
            .transport(Arc::new(transport))
            .bus(config.bus.backend.build())
            .header_name(config.correlation.header_name.clone())
            .build())
    }

    /// The bus this client publishes lifecycle events on.
    pub fn bus(&self) -> Arc<dyn EventBus> {
        Arc::clone(&self.bus)
    }

    /// Header name carrying the correlation ID.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Send one request through the interception pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the transport produced no
    /// response; in that case no completion event is published.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let correlation_id = self.ids.next();
        request.set_header(&self.header_name, correlation_id.as_str());

        tracing::debug!(
            correlation_id = %correlation_id,
            method = %request.method,
            url = %request.url,
            "request started"
        );
        metrics::record_request_started(&request.method);
        self.publish_event(
            events::AJAX_STARTED,
            &RequestEvent {
                correlation_id: correlation_id.to_string(),
                method: request.method.clone(),
                url: request.url.clone(),
            },
        );

        // Suspension point: completion resumes here, possibly
        // interleaved with other in-flight requests.
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(correlation_id = %correlation_id, %error, "transport failure");
                metrics::record_transport_failure();
                return Err(error);
            }
        };

        let echoed = response.header(&self.header_name).unwrap_or_default().to_string();
        if echoed.is_empty() {
            tracing::debug!(
                correlation_id = %correlation_id,
                "correlation header not echoed by server"
            );
        }

        tracing::debug!(
            correlation_id = %echoed,
            status = response.status,
            "request completed"
        );
        metrics::record_request_completed(response.status);
        self.publish_event(
            events::AJAX_COMPLETED,
            &ResponseEvent {
                correlation_id: echoed,
                status_code: response.status,
                body: response.body.clone(),
            },
        );

        if let Some(continuation) = Continuation::parse(&response.body) {
            let ctx = PolicyContext {
                bus: Arc::clone(&self.bus),
                window: Arc::clone(&self.window),
            };
            self.engine.evaluate(&continuation, &ctx);
        }

        Ok(response)
    }

    fn publish_event<E: Serialize>(&self, topic: &str, event: &E) {
        match serde_json::to_value(event) {
            Ok(payload) => self.bus.publish(topic, payload),
            Err(error) => tracing::error!(topic, %error, "failed to serialize lifecycle event"),
        }
    }
}

impl Default for ContinuationClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder injecting the client's capabilities. Anything left unset
/// falls back to the production default.
pub struct ContinuationClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    bus: Option<Arc<dyn EventBus>>,
    window: Option<Arc<dyn WindowService>>,
    engine: PolicyEngine,
    header_name: String,
}

impl ContinuationClientBuilder {
    fn new() -> Self {
        Self {
            transport: None,
            bus: None,
            window: None,
            engine: PolicyEngine::with_defaults(),
            header_name: X_CORRELATION_ID.to_string(),
        }
    }

    /// Use the given transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use the given event bus.
    pub fn bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Use the given navigation service.
    pub fn window(mut self, window: Arc<dyn WindowService>) -> Self {
        self.window = Some(window);
        self
    }

    /// Register an additional policy after the built-ins.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.engine.register(policy);
        self
    }

    /// Replace the whole policy table.
    pub fn engine(mut self, engine: PolicyEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Override the correlation header name.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Assemble the client.
    pub fn build(self) -> ContinuationClient {
        ContinuationClient {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            bus: self
                .bus
                .or_else(bus::global)
                .unwrap_or_else(|| Arc::new(InMemoryBus::new())),
            window: self.window.unwrap_or_else(|| Arc::new(LoggingWindow)),
            engine: self.engine,
            ids: CorrelationIdGenerator::new(),
            header_name: self.header_name,
        }
    }
}
