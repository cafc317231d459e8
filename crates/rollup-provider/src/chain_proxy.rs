//! Base-chain token registry bridge.

use crate::error::{ProviderError, ProviderResult};
use alloy::primitives::Address;
use alloy::sol;
use alloy::sol_types::SolCall;
use rollup_transport::{BoxFuture, Transport};
use rollup_types::ContractAddress;
use serde_json::{json, Value};
use tracing::debug;

sol! {
    interface Governance {
        function tokenIds(address token) external view returns (uint16);
    }
}

/// Read access to the governance contract's token id table.
pub trait GovernanceRegistry: Send + Sync {
    /// Registered id for `token`; `0` means not registered.
    fn token_id(&self, token: Address) -> BoxFuture<'_, ProviderResult<u16>>;
}

/// [`GovernanceRegistry`] backed by `eth_call` against a base-chain node.
pub struct EthCallRegistry {
    transport: Box<dyn Transport>,
    governance: Address,
}

impl EthCallRegistry {
    pub fn new(transport: Box<dyn Transport>, governance: Address) -> Self {
        Self {
            transport,
            governance,
        }
    }

    pub fn governance(&self) -> Address {
        self.governance
    }

    async fn call_token_ids(&self, token: Address) -> ProviderResult<u16> {
        let data = Governance::tokenIdsCall { token }.abi_encode();
        let params = json!([
            {
                "to": self.governance.to_string(),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest"
        ]);

        let raw = self.transport.request("eth_call", params).await?;
        let text = match &raw {
            Value::String(s) => s.as_str(),
            other => {
                return Err(ProviderError::Chain(format!(
                    "eth_call returned non-string result: {other}"
                )))
            }
        };
        let bytes = hex::decode(text.trim_start_matches("0x"))
            .map_err(|e| ProviderError::Chain(format!("eth_call returned invalid hex: {e}")))?;
        let decoded = Governance::tokenIdsCall::abi_decode_returns(&bytes, true)
            .map_err(|e| ProviderError::Chain(format!("tokenIds decode failed: {e}")))?;
        Ok(decoded._0)
    }
}

impl GovernanceRegistry for EthCallRegistry {
    fn token_id(&self, token: Address) -> BoxFuture<'_, ProviderResult<u16>> {
        Box::pin(self.call_token_ids(token))
    }
}

/// Rollup-aware view of the base chain.
pub struct ChainProxy<R> {
    registry: R,
    contract_address: ContractAddress,
}

impl ChainProxy<EthCallRegistry> {
    /// Proxy that queries governance through a base-chain JSON-RPC transport.
    pub fn over_rpc(eth_transport: Box<dyn Transport>, contract_address: ContractAddress) -> Self {
        let registry = EthCallRegistry::new(eth_transport, contract_address.gov_contract);
        Self::new(registry, contract_address)
    }
}

impl<R: GovernanceRegistry> ChainProxy<R> {
    pub fn new(registry: R, contract_address: ContractAddress) -> Self {
        Self {
            registry,
            contract_address,
        }
    }

    pub fn contract_address(&self) -> &ContractAddress {
        &self.contract_address
    }

    pub fn main_contract(&self) -> Address {
        self.contract_address.main_contract
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Rollup token id for a base-chain token address.
    ///
    /// The zero address is the native asset and always has id 0 without a
    /// registry call. Any other token the registry reports as 0 is not
    /// supported by the rollup.
    pub async fn resolve_token_id(&self, token: Address) -> ProviderResult<u16> {
        if token == Address::ZERO {
            return Ok(0);
        }

        let id = self.registry.token_id(token).await?;
        if id == 0 {
            return Err(ProviderError::UnsupportedToken(format!(
                "ERC20 token {token} is not supported"
            )));
        }

        debug!(%token, id, "Resolved token id");
        Ok(id)
    }
}
