//! Base-chain signatures attached to submitted transactions.

use serde::{Deserialize, Serialize};

/// Signature authorizing a rollup transaction from a base-chain account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TxEthSignature {
    /// Plain ECDSA signature by an externally owned account.
    EthereumSignature { signature: String },
    /// Contract-account signature checked via EIP-1271.
    #[serde(rename = "EIP1271Signature")]
    Eip1271Signature { signature: String },
}

impl TxEthSignature {
    pub fn signature(&self) -> &str {
        match self {
            Self::EthereumSignature { signature } | Self::Eip1271Signature { signature } => {
                signature
            }
        }
    }
}
