//! Settlement confirmation waiting.
//!
//! Resolves exactly once when an event reaches a milestone:
//! - streaming transport: subscribe, take the first push, release the
//!   subscription (fire-and-forget), decode the push
//! - plain transport: fetch the receipt, and while the milestone is not
//!   reached sleep `poll_interval` and fetch again
//!
//! Polling is unbounded and only retries on "not reached yet"; a transport
//! failure ends the wait with that error. Callers needing a deadline wrap the
//! wait (e.g. `tokio::time::timeout`); dropping the wait releases any
//! subscription it holds.

use crate::error::ProviderResult;
use crate::provider::decode;
use rollup_transport::{Transport, TransportError};
use rollup_types::{Milestone, Settlement};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Interval between receipt polls on transports without subscriptions.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// RPC surface of one watchable event kind plus the event identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTarget {
    pub subscribe_method: &'static str,
    pub unsubscribe_method: &'static str,
    /// Receipt method used when polling.
    pub info_method: &'static str,
    /// Transaction hash or priority-op serial id.
    pub id: Value,
}

impl WatchTarget {
    /// A rollup transaction by hash.
    pub fn transaction(hash: &str) -> Self {
        Self {
            subscribe_method: "tx_subscribe",
            unsubscribe_method: "tx_unsubscribe",
            info_method: "tx_info",
            id: json!(hash),
        }
    }

    /// A base-chain priority operation by serial id.
    pub fn priority_op(serial_id: u64) -> Self {
        Self {
            subscribe_method: "ethop_subscribe",
            unsubscribe_method: "ethop_unsubscribe",
            info_method: "ethop_info",
            id: json!(serial_id),
        }
    }
}

/// Waits for a milestone using the cheapest mechanism the transport offers.
pub struct ConfirmationWaiter<'a> {
    transport: &'a dyn Transport,
    poll_interval: Duration,
}

impl<'a> ConfirmationWaiter<'a> {
    pub fn new(transport: &'a dyn Transport, poll_interval: Duration) -> Self {
        Self {
            transport,
            poll_interval,
        }
    }

    /// Wait until `target` reaches `milestone` and return its receipt.
    pub async fn wait<R>(&self, target: &WatchTarget, milestone: Milestone) -> ProviderResult<R>
    where
        R: DeserializeOwned + Settlement,
    {
        if self.transport.subscriptions_supported() {
            self.wait_for_push(target, milestone).await
        } else {
            self.poll_until(target, milestone).await
        }
    }

    async fn wait_for_push<R>(&self, target: &WatchTarget, milestone: Milestone) -> ProviderResult<R>
    where
        R: DeserializeOwned,
    {
        let mut subscription = self
            .transport
            .subscribe(
                target.subscribe_method,
                json!([target.id, milestone]),
                target.unsubscribe_method,
            )
            .await?;
        debug!(
            id = %target.id,
            %milestone,
            subscription = %subscription.id(),
            "Waiting for settlement notification"
        );

        let payload = subscription.next().await;
        subscription.unsubscribe_detached();

        let payload = payload.ok_or_else(|| {
            TransportError::ConnectionClosed(format!(
                "{} ended before {milestone} notification",
                target.subscribe_method
            ))
        })?;

        debug!(id = %target.id, %milestone, "Settlement notification received");
        decode(target.subscribe_method, payload)
    }

    async fn poll_until<R>(&self, target: &WatchTarget, milestone: Milestone) -> ProviderResult<R>
    where
        R: DeserializeOwned + Settlement,
    {
        let params = json!([target.id]);
        let mut polls = 0u64;

        loop {
            let raw = self.transport.request(target.info_method, params.clone()).await?;
            let receipt: R = decode(target.info_method, raw)?;
            polls += 1;

            if receipt.has_reached(milestone) {
                debug!(id = %target.id, %milestone, polls, "Milestone reached");
                return Ok(receipt);
            }

            debug!(
                id = %target.id,
                %milestone,
                polls,
                interval_ms = self.poll_interval.as_millis(),
                "Milestone not reached, polling again"
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
