//! Base-chain contract registry.

use crate::serde_ext;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Addresses of the rollup's base-chain contracts (`contract_address` RPC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddress {
    /// Main rollup contract (deposits, block commits).
    #[serde(rename = "mainContract", with = "serde_ext::address")]
    pub main_contract: Address,
    /// Governance contract (token registry).
    #[serde(rename = "govContract", with = "serde_ext::address")]
    pub gov_contract: Address,
}
