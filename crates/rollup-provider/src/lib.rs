//! Rollup provider.
//!
//! `Provider` owns one transport, caches the contract registry and token set
//! fetched at construction, and exposes the rollup's RPC surface as typed
//! async operations. Waiting for a settlement milestone uses a push
//! subscription when the transport supports it and polling otherwise.
//!
//! `ChainProxy` bridges token addresses to rollup token ids through the
//! base-chain governance contract.

pub mod chain_proxy;
pub mod config;
pub mod error;
pub mod network;
pub mod provider;
pub mod waiter;

pub use chain_proxy::{ChainProxy, EthCallRegistry, GovernanceRegistry};
pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderResult};
pub use network::{
    default_endpoint, get_default_provider, resolve_default_endpoint, Endpoint, Network,
    TransportKind, ENDPOINTS,
};
pub use provider::Provider;
pub use waiter::{ConfirmationWaiter, WatchTarget, DEFAULT_POLL_INTERVAL};
