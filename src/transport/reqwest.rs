//! Production transport over `reqwest::Client`.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Client;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

/// [`Transport`] backed by a shared `reqwest::Client`. Cheap to clone;
/// connection pooling lives inside the client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's default client settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport enforcing a total per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let method = reqwest::Method::from_bytes(request.method.as_bytes())
                .map_err(|_| TransportError::InvalidRequest(format!("bad method: {}", request.method)))?;

            let mut builder = client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(Box::new(e)))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Network(Box::new(e)))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}
