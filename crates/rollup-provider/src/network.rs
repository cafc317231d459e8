//! Well-known rollup endpoints.
//!
//! The endpoint table is static configuration: every supported
//! (network, transport) pair maps to one URL. Unknown names fail explicitly.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Rollup deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Localhost,
    Rinkeby,
    Ropsten,
    Mainnet,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Localhost => write!(f, "localhost"),
            Self::Rinkeby => write!(f, "rinkeby"),
            Self::Ropsten => write!(f, "ropsten"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "localhost" => Ok(Self::Localhost),
            "rinkeby" => Ok(Self::Rinkeby),
            "ropsten" => Ok(Self::Ropsten),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(ProviderError::UnsupportedNetwork(other.to_string())),
        }
    }
}

/// Transport style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Push-capable WebSocket.
    #[default]
    Ws,
    /// Plain HTTP request/response.
    Http,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ws => write!(f, "WS"),
            Self::Http => write!(f, "HTTP"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WS" => Ok(Self::Ws),
            "HTTP" => Ok(Self::Http),
            _ => Err(ProviderError::UnsupportedTransport(s.to_string())),
        }
    }
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub network: Network,
    pub kind: TransportKind,
    pub url: &'static str,
}

const fn endpoint(network: Network, kind: TransportKind, url: &'static str) -> Endpoint {
    Endpoint { network, kind, url }
}

/// Fixed endpoints for every supported network and transport style.
pub const ENDPOINTS: [Endpoint; 8] = [
    endpoint(Network::Localhost, TransportKind::Ws, "ws://127.0.0.1:3031"),
    endpoint(Network::Localhost, TransportKind::Http, "http://127.0.0.1:3030"),
    endpoint(Network::Ropsten, TransportKind::Ws, "wss://ropsten-api.zksync.dev/jsrpc-ws"),
    endpoint(Network::Ropsten, TransportKind::Http, "https://ropsten-api.zksync.dev/jsrpc"),
    endpoint(Network::Rinkeby, TransportKind::Ws, "wss://rinkeby-api.zksync.dev/jsrpc-ws"),
    endpoint(Network::Rinkeby, TransportKind::Http, "https://rinkeby-api.zksync.dev/jsrpc"),
    endpoint(Network::Mainnet, TransportKind::Ws, "wss://api.zksync.io/jsrpc-ws"),
    endpoint(Network::Mainnet, TransportKind::Http, "https://api.zksync.io/jsrpc"),
];

/// Look up the endpoint for a network and transport style.
pub fn default_endpoint(network: Network, kind: TransportKind) -> ProviderResult<&'static Endpoint> {
    ENDPOINTS
        .iter()
        .find(|e| e.network == network && e.kind == kind)
        .ok_or_else(|| ProviderError::UnsupportedNetwork(format!("{network} over {kind}")))
}

/// Resolve names against the endpoint table without connecting.
pub fn resolve_default_endpoint(network: &str, transport: &str) -> ProviderResult<&'static Endpoint> {
    let network: Network = network.parse()?;
    let kind: TransportKind = transport.parse()?;
    default_endpoint(network, kind)
}

/// Connect a provider to a well-known network.
///
/// `network` is one of `localhost`, `rinkeby`, `ropsten`, `mainnet`;
/// `transport` is `WS` or `HTTP`.
pub async fn get_default_provider(network: &str, transport: &str) -> ProviderResult<Provider> {
    let endpoint = resolve_default_endpoint(network, transport)?;
    info!(network = %endpoint.network, transport = %endpoint.kind, url = endpoint.url, "Using default endpoint");

    match endpoint.kind {
        TransportKind::Ws => Provider::new_websocket_provider(endpoint.url).await,
        TransportKind::Http => Provider::new_http_provider(endpoint.url).await,
    }
}
