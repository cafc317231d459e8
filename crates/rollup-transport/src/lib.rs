//! JSON-RPC transports for the rollup client.
//!
//! Two transports implement the [`Transport`] capability contract:
//! - [`HttpTransport`]: one POST per request, no subscriptions
//! - [`WsTransport`]: persistent WebSocket with id-correlated requests and
//!   server-pushed subscription notifications
//!
//! Neither transport retries or reconnects; that is a caller concern.

pub mod error;
pub mod http;
pub mod message;
pub mod subscription;
pub mod transport;
pub mod ws;

pub use error::{TransportError, TransportResult};
pub use http::{HttpConfig, HttpTransport};
pub use message::{Incoming, RpcErrorObject, RpcNotification, RpcRequest, RpcResponse, SubscriptionId};
pub use subscription::{Subscription, SubscriptionHost};
pub use transport::{BoxFuture, Transport};
pub use ws::{ConnectionState, WsConfig, WsTransport};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any `wss://` connection is made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
