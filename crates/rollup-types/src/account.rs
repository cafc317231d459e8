//! Account state as reported by `account_info`.

use crate::serde_ext;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances and nonce at one settlement level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Symbol -> balance in smallest units.
    #[serde(with = "serde_ext::amount_map", default)]
    pub balances: BTreeMap<String, U256>,
    pub nonce: u32,
    /// Hash of the account's signing public key (`sync:...`); absent before key setup.
    #[serde(rename = "pubKeyHash", default)]
    pub pub_key_hash: String,
}

impl AccountSnapshot {
    /// Balance for a symbol, zero when the account holds none.
    pub fn balance(&self, symbol: &str) -> U256 {
        self.balances.get(symbol).copied().unwrap_or_default()
    }
}

/// A deposit seen on the base chain that the rollup has not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositingBalance {
    #[serde(with = "serde_ext::amount")]
    pub amount: U256,
    /// Base-chain block at which the deposit is expected to be accepted.
    #[serde(rename = "expectedAcceptBlock")]
    pub expected_accept_block: u64,
}

/// Pending deposits keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositingFunds {
    #[serde(default)]
    pub balances: BTreeMap<String, DepositingBalance>,
}

/// Full account view: pending deposits, committed and verified state.
///
/// Never cached; every `account_info` call returns a fresh view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    #[serde(with = "serde_ext::address")]
    pub address: Address,
    /// Rollup account id, assigned once the account receives its first deposit.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub depositing: DepositingFunds,
    /// State including transactions included in committed (not yet proven) blocks.
    pub committed: AccountSnapshot,
    /// State proven on the base chain.
    pub verified: AccountSnapshot,
}
