//! Core domain types for the rollup client.
//!
//! This crate provides the data model shared by the transport and provider layers:
//! - `ContractAddress`: base-chain contract registry (main + governance)
//! - `Token`, `TokenSet`, `TokenLike`: token registry and symbol/address resolution
//! - `AccountState`: committed/verified balances and nonces
//! - `TransactionReceipt`, `PriorityOperationReceipt`: settlement lifecycle
//! - `Fee`: arbitrary-precision fee breakdown

pub mod account;
pub mod contract;
pub mod error;
pub mod fee;
pub mod receipt;
pub mod serde_ext;
pub mod signature;
pub mod token;

pub use account::{AccountSnapshot, AccountState, DepositingBalance, DepositingFunds};
pub use contract::ContractAddress;
pub use error::{TypesError, TypesResult};
pub use fee::{Fee, TxFeeType};
pub use receipt::{BlockInfo, Milestone, PriorityOperationReceipt, Settlement, TransactionReceipt};
pub use signature::TxEthSignature;
pub use token::{format_units, is_token_eth, parse_units, Token, TokenLike, TokenSet, Tokens};

pub use alloy::primitives::{Address, U256};
