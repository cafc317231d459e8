//! Push subscription handle.
//!
//! A [`Subscription`] owns one server-side registration. It is released
//! exactly once: explicitly via [`Subscription::unsubscribe`] /
//! [`Subscription::unsubscribe_detached`], or on drop. Releasing deregisters
//! the local notification route synchronously and sends the unsubscribe call,
//! so a consumer that is cancelled mid-wait does not leak the registration.

use crate::error::TransportResult;
use crate::message::SubscriptionId;
use crate::transport::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Connection side of a subscription: routes notifications and performs unsubscribe.
pub trait SubscriptionHost: Send + Sync {
    /// Stop routing notifications for `id`.
    fn release(&self, id: &SubscriptionId);

    /// Send `method([id])` to the server.
    fn unsubscribe(
        self: Arc<Self>,
        method: String,
        id: SubscriptionId,
    ) -> BoxFuture<'static, TransportResult<()>>;
}

/// Active push-stream registration.
pub struct Subscription {
    id: SubscriptionId,
    unsubscribe_method: String,
    notifications: mpsc::UnboundedReceiver<Value>,
    host: Arc<dyn SubscriptionHost>,
    released: bool,
}

impl Subscription {
    /// Create a subscription handle.
    ///
    /// `notifications` must be the receiving end of the route the host
    /// registered for `id`.
    pub fn new(
        id: SubscriptionId,
        unsubscribe_method: impl Into<String>,
        notifications: mpsc::UnboundedReceiver<Value>,
        host: Arc<dyn SubscriptionHost>,
    ) -> Self {
        Self {
            id,
            unsubscribe_method: unsubscribe_method.into(),
            notifications,
            host,
            released: false,
        }
    }

    /// Server-assigned id.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Wait for the next notification payload.
    ///
    /// Returns `None` once the route is gone (connection lost).
    pub async fn next(&mut self) -> Option<Value> {
        self.notifications.recv().await
    }

    /// Release and wait for the server to acknowledge the unsubscribe.
    pub async fn unsubscribe(mut self) -> TransportResult<()> {
        self.release().await
    }

    /// Release without waiting; an unsubscribe failure is only logged.
    pub fn unsubscribe_detached(mut self) {
        let fut = self.release();
        spawn_unsubscribe(self.id.clone(), fut);
    }

    fn release(&mut self) -> BoxFuture<'static, TransportResult<()>> {
        self.released = true;
        self.host.release(&self.id);
        self.notifications.close();
        debug!(subscription = %self.id, method = %self.unsubscribe_method, "Releasing subscription");
        self.host
            .clone()
            .unsubscribe(self.unsubscribe_method.clone(), self.id.clone())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.released {
            let fut = self.release();
            spawn_unsubscribe(self.id.clone(), fut);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("unsubscribe_method", &self.unsubscribe_method)
            .field("released", &self.released)
            .finish()
    }
}

fn spawn_unsubscribe(id: SubscriptionId, fut: BoxFuture<'static, TransportResult<()>>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = fut.await {
                    warn!(subscription = %id, ?e, "Unsubscribe failed");
                }
            });
        }
        Err(_) => {
            warn!(subscription = %id, "No runtime available, server-side unsubscribe skipped");
        }
    }
}
