//! Settlement receipts and lifecycle milestones.
//!
//! A transaction or priority operation passes two observable milestones:
//! COMMIT (included in a committed block) and VERIFY (block proven on the
//! base chain). Both flags are monotonic: once reported true they stay true.

use serde::{Deserialize, Serialize};

/// Settlement milestone to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Milestone {
    Commit,
    Verify,
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commit => write!(f, "COMMIT"),
            Self::Verify => write!(f, "VERIFY"),
        }
    }
}

impl std::str::FromStr for Milestone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMMIT" => Ok(Self::Commit),
            "VERIFY" => Ok(Self::Verify),
            other => Err(format!("unknown milestone: {other}")),
        }
    }
}

/// Block an event was included in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub block_number: u64,
    pub committed: bool,
    pub verified: bool,
}

impl BlockInfo {
    /// Whether the block has passed `milestone`.
    pub fn has_reached(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::Commit => self.committed,
            Milestone::Verify => self.verified,
        }
    }
}

/// Anything carrying an optional settlement block.
pub trait Settlement {
    fn block(&self) -> Option<&BlockInfo>;

    /// A milestone is reached once the block is present and its flag is set.
    fn has_reached(&self, milestone: Milestone) -> bool {
        self.block().is_some_and(|b| b.has_reached(milestone))
    }
}

/// `tx_info` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Whether the transaction has been executed by the rollup.
    pub executed: bool,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub fail_reason: Option<String>,
    #[serde(default)]
    pub block: Option<BlockInfo>,
}

impl Settlement for TransactionReceipt {
    fn block(&self) -> Option<&BlockInfo> {
        self.block.as_ref()
    }
}

/// `ethop_info` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOperationReceipt {
    pub executed: bool,
    #[serde(default)]
    pub block: Option<BlockInfo>,
}

impl Settlement for PriorityOperationReceipt {
    fn block(&self) -> Option<&BlockInfo> {
        self.block.as_ref()
    }
}
