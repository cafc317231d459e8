//! Transaction fee breakdown (`get_tx_fee`).

use crate::serde_ext;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Transaction kinds the fee endpoint prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxFeeType {
    Withdraw,
    Transfer,
}

impl std::fmt::Display for TxFeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Withdraw => write!(f, "Withdraw"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

impl std::str::FromStr for TxFeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "withdraw" => Ok(Self::Withdraw),
            "transfer" => Ok(Self::Transfer),
            other => Err(format!("unknown fee type: {other}")),
        }
    }
}

/// Fee for one transaction, all amounts in the fee token's smallest units.
///
/// The remote encodes numeric fields as decimal strings; they are decoded
/// into arbitrary-precision integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub fee_type: String,
    #[serde(with = "serde_ext::amount")]
    pub gas_tx_amount: U256,
    #[serde(with = "serde_ext::amount")]
    pub gas_price_wei: U256,
    #[serde(with = "serde_ext::amount")]
    pub gas_fee: U256,
    #[serde(with = "serde_ext::amount")]
    pub zkp_fee: U256,
    #[serde(with = "serde_ext::amount")]
    pub total_fee: U256,
}
