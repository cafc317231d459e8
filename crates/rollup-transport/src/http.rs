//! Plain request/response transport over HTTP.
//!
//! Each request is one POST of a JSON-RPC body. Subscriptions are not
//! available on this transport.

use crate::error::{TransportError, TransportResult};
use crate::message::{RpcRequest, RpcResponse};
use crate::subscription::Subscription;
use crate::transport::{BoxFuture, Transport};
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP transport configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl HttpConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: None,
        }
    }
}

/// JSON-RPC over HTTP.
pub struct HttpTransport {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport for `url` without a request timeout.
    pub fn new(url: impl Into<String>) -> TransportResult<Self> {
        Self::with_config(HttpConfig::new(url))
    }

    pub fn with_config(config: HttpConfig) -> TransportResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> TransportResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        debug!(url = %self.url, id, method, "Sending HTTP JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| TransportError::ParseError(format!("Failed to parse response: {e}")))?;

        if body.id != id {
            warn!(expected = id, received = body.id, method, "Response id mismatch");
        }

        body.into_result()
    }
}

impl Transport for HttpTransport {
    fn request<'a>(&'a self, method: &'a str, params: Value) -> BoxFuture<'a, TransportResult<Value>> {
        Box::pin(self.call(method, params))
    }

    fn subscriptions_supported(&self) -> bool {
        false
    }

    fn subscribe<'a>(
        &'a self,
        subscribe_method: &'a str,
        _params: Value,
        _unsubscribe_method: &'a str,
    ) -> BoxFuture<'a, TransportResult<Subscription>> {
        Box::pin(async move {
            Err(TransportError::UnsupportedOperation(format!(
                "{subscribe_method}: subscriptions are not supported over HTTP"
            )))
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
