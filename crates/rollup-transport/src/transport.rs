//! Transport capability contract.

use crate::error::TransportResult;
use crate::subscription::Subscription;
use serde_json::Value;
use std::pin::Pin;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// A JSON-RPC transport.
///
/// Every transport can issue correlated requests. Subscription support is an
/// optional capability probed with [`Transport::subscriptions_supported`];
/// transports without it fail `subscribe` with
/// [`TransportError::UnsupportedOperation`](crate::TransportError::UnsupportedOperation)
/// instead of emulating pushes. No retry happens at this layer.
pub trait Transport: Send + Sync {
    /// Send `method(params)` and wait for its result.
    fn request<'a>(&'a self, method: &'a str, params: Value) -> BoxFuture<'a, TransportResult<Value>>;

    /// Whether `subscribe` is available.
    fn subscriptions_supported(&self) -> bool;

    /// Register a push subscription.
    ///
    /// `subscribe_method(params)` must return a subscription id. The returned
    /// [`Subscription`] yields notifications for that id and issues
    /// `unsubscribe_method([id])` when released.
    fn subscribe<'a>(
        &'a self,
        subscribe_method: &'a str,
        params: Value,
        unsubscribe_method: &'a str,
    ) -> BoxFuture<'a, TransportResult<Subscription>>;

    /// Close the underlying connection.
    fn disconnect(&self) -> BoxFuture<'_, TransportResult<()>>;
}
