//! In-process transport that replays scripted responses.
//!
//! Every call is recorded. Responses are taken from a per-method queue first,
//! then from a sticky per-method answer. Subscription pushes are delivered
//! immediately at subscribe time.

#![allow(dead_code)]

use parking_lot::Mutex;
use rollup_transport::{
    BoxFuture, Subscription, SubscriptionHost, SubscriptionId, Transport, TransportError,
    TransportResult,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Step {
    Result(Value),
    RpcError(i64, String),
    Closed,
}

impl Step {
    fn into_result(self) -> TransportResult<Value> {
        match self {
            Self::Result(v) => Ok(v),
            Self::RpcError(code, message) => Err(TransportError::Rpc { code, message }),
            Self::Closed => Err(TransportError::ConnectionClosed("scripted close".to_string())),
        }
    }
}

#[derive(Default)]
struct ScriptState {
    streaming: bool,
    queued: Mutex<HashMap<String, VecDeque<Step>>>,
    sticky: Mutex<HashMap<String, Step>>,
    calls: Mutex<Vec<(String, Value)>>,
    pushes: Mutex<Vec<Value>>,
    end_after_pushes: Mutex<bool>,
    open_routes: Mutex<Vec<mpsc::UnboundedSender<Value>>>,
    released: Mutex<Vec<SubscriptionId>>,
    unsubscribes: Mutex<Vec<(String, SubscriptionId)>>,
    next_subscription: AtomicU64,
}

impl SubscriptionHost for ScriptState {
    fn release(&self, id: &SubscriptionId) {
        self.released.lock().push(id.clone());
    }

    fn unsubscribe(
        self: Arc<Self>,
        method: String,
        id: SubscriptionId,
    ) -> BoxFuture<'static, TransportResult<()>> {
        self.unsubscribes.lock().push((method, id));
        Box::pin(async { Ok(()) })
    }
}

/// Cloneable handle; clones share the same script and call log.
#[derive(Clone)]
pub struct ScriptedTransport {
    state: Arc<ScriptState>,
}

impl ScriptedTransport {
    /// Request/response only.
    pub fn plain() -> Self {
        Self {
            state: Arc::new(ScriptState::default()),
        }
    }

    /// Supports subscriptions.
    pub fn streaming() -> Self {
        Self {
            state: Arc::new(ScriptState {
                streaming: true,
                ..Default::default()
            }),
        }
    }

    /// Answer every `method` call with `result` once the queue is empty.
    pub fn always(&self, method: &str, result: Value) -> &Self {
        self.state
            .sticky
            .lock()
            .insert(method.to_string(), Step::Result(result));
        self
    }

    /// Fail every `method` call once the queue is empty.
    pub fn always_fail(&self, method: &str, step: Step) -> &Self {
        self.state.sticky.lock().insert(method.to_string(), step);
        self
    }

    /// Answer the next `method` call with `step`.
    pub fn then(&self, method: &str, step: Step) -> &Self {
        self.state
            .queued
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(step);
        self
    }

    /// Payloads delivered to every new subscription.
    pub fn push(&self, payload: Value) -> &Self {
        self.state.pushes.lock().push(payload);
        self
    }

    /// End each subscription once its pushes are delivered.
    pub fn end_after_pushes(&self) -> &Self {
        *self.state.end_after_pushes.lock() = true;
        self
    }

    /// Script `contract_address` and `tokens` as a healthy node would.
    pub fn with_bootstrap(self) -> Self {
        self.always("contract_address", contract_address_json());
        self.always("tokens", tokens_json());
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.calls.lock().clone()
    }

    pub fn calls_for(&self, method: &str) -> Vec<Value> {
        self.state
            .calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn unsubscribes(&self) -> Vec<(String, SubscriptionId)> {
        self.state.unsubscribes.lock().clone()
    }

    pub fn released(&self) -> Vec<SubscriptionId> {
        self.state.released.lock().clone()
    }

    fn next_step(&self, method: &str) -> Step {
        if let Some(step) = self
            .state
            .queued
            .lock()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return step;
        }
        self.state
            .sticky
            .lock()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Step::RpcError(-32601, format!("no script for {method}")))
    }

    fn record(&self, method: &str, params: &Value) {
        self.state
            .calls
            .lock()
            .push((method.to_string(), params.clone()));
    }
}

impl Transport for ScriptedTransport {
    fn request<'a>(&'a self, method: &'a str, params: Value) -> BoxFuture<'a, TransportResult<Value>> {
        self.record(method, &params);
        let step = self.next_step(method);
        Box::pin(async move { step.into_result() })
    }

    fn subscriptions_supported(&self) -> bool {
        self.state.streaming
    }

    fn subscribe<'a>(
        &'a self,
        subscribe_method: &'a str,
        params: Value,
        unsubscribe_method: &'a str,
    ) -> BoxFuture<'a, TransportResult<Subscription>> {
        Box::pin(async move {
            if !self.state.streaming {
                return Err(TransportError::UnsupportedOperation(
                    "subscriptions".to_string(),
                ));
            }
            self.record(subscribe_method, &params);

            let n = self.state.next_subscription.fetch_add(1, Ordering::SeqCst) + 1;
            let id = SubscriptionId::Number(n);
            let (tx, rx) = mpsc::unbounded_channel();
            for payload in self.state.pushes.lock().iter() {
                let _ = tx.send(payload.clone());
            }
            if !*self.state.end_after_pushes.lock() {
                self.state.open_routes.lock().push(tx);
            }

            let host: Arc<dyn SubscriptionHost> = self.state.clone();
            Ok(Subscription::new(id, unsubscribe_method, rx, host))
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, TransportResult<()>> {
        self.state.open_routes.lock().clear();
        Box::pin(async { Ok(()) })
    }
}

pub fn contract_address_json() -> Value {
    json!({
        "mainContract": "0x1111111111111111111111111111111111111111",
        "govContract": "0x2222222222222222222222222222222222222222"
    })
}

pub fn tokens_json() -> Value {
    json!({
        "ETH": {
            "address": "0x0000000000000000000000000000000000000000",
            "id": 0,
            "symbol": "ETH",
            "decimals": 18
        },
        "DAI": {
            "address": "0x3333333333333333333333333333333333333333",
            "id": 1,
            "symbol": "DAI",
            "decimals": 18
        },
        "USDC": {
            "address": "0x4444444444444444444444444444444444444444",
            "id": 2,
            "symbol": "USDC",
            "decimals": 6
        }
    })
}

/// `tx_info` / `ethop_info` shaped receipt.
pub fn receipt_json(block_number: u64, committed: bool, verified: bool) -> Value {
    json!({
        "executed": true,
        "success": true,
        "fail_reason": null,
        "block": {
            "block_number": block_number,
            "committed": committed,
            "verified": verified
        }
    })
}

pub fn pending_receipt_json() -> Value {
    json!({ "executed": false, "block": null })
}
