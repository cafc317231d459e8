//! Provider configuration.

use crate::error::{ProviderError, ProviderResult};
use crate::network::{default_endpoint, Network, TransportKind};
use crate::waiter::DEFAULT_POLL_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which rollup to talk to and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Network name (`localhost`, `rinkeby`, `ropsten`, `mainnet`).
    #[serde(default = "default_network")]
    pub network: String,
    /// Transport style. Default: ws.
    #[serde(default)]
    pub transport: TransportKind,
    /// Explicit endpoint URL; overrides the network table.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Receipt poll interval for non-streaming transports (ms). Default: 3000.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// HTTP request timeout (ms). Absent: no timeout.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Base-chain JSON-RPC URL for governance lookups.
    #[serde(default)]
    pub eth_rpc_url: Option<String>,
}

fn default_network() -> String {
    Network::Localhost.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            transport: TransportKind::default(),
            endpoint: None,
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: None,
            eth_rpc_url: None,
        }
    }
}

impl ProviderConfig {
    /// Load from `ROLLUP_CONFIG` (default `config/default.toml`), falling back to defaults.
    pub fn load() -> ProviderResult<Self> {
        let config_path =
            std::env::var("ROLLUP_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProviderError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ProviderResult<Self> {
        toml::from_str(content)
            .map_err(|e| ProviderError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Transport style and URL to connect to.
    pub fn resolve_endpoint(&self) -> ProviderResult<(TransportKind, String)> {
        if let Some(url) = &self.endpoint {
            return Ok((self.transport, url.clone()));
        }
        let network: Network = self.network.parse()?;
        let endpoint = default_endpoint(network, self.transport)?;
        Ok((endpoint.kind, endpoint.url.to_string()))
    }
}
