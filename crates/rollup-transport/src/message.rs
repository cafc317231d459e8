//! JSON-RPC 2.0 message types.

use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Request (Outgoing)
// ============================================================================

/// JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    /// Always "2.0".
    pub jsonrpc: &'static str,
    /// Request ID for response correlation.
    pub id: u64,
    pub method: &'a str,
    /// Positional params (array) or `null`.
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

// ============================================================================
// Response / Notification (Incoming)
// ============================================================================

/// Error object of a failed call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Response to a request, matched by `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Convert into the call outcome; a remote error object becomes `TransportError::Rpc`.
    pub fn into_result(self) -> TransportResult<Value> {
        match self.error {
            Some(err) => Err(TransportError::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }
}

/// Server-assigned subscription id. Servers use either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionId {
    Number(u64),
    String(String),
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// Params of a subscription push.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationParams {
    pub subscription: SubscriptionId,
    #[serde(default)]
    pub result: Value,
}

/// Server push for an active subscription (no `id`).
#[derive(Debug, Clone, Deserialize)]
pub struct RpcNotification {
    pub method: String,
    pub params: NotificationParams,
}

/// Any inbound message on a streaming connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
    Response(RpcResponse),
    Notification(RpcNotification),
}
