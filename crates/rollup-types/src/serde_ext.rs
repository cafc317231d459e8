//! Serde adapters for base-chain primitives.
//!
//! The remote service encodes amounts inconsistently: decimal strings for
//! balances and fees, `0x`-prefixed hex in some responses, and plain JSON
//! integers for small values. All of them decode into `U256`; amounts are
//! always re-encoded as decimal strings.

use crate::error::{TypesError, TypesResult};
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use std::str::FromStr;

/// Wire representation of an amount before normalization.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Integer(u64),
}

impl RawAmount {
    fn into_u256(self) -> TypesResult<U256> {
        match self {
            Self::Text(text) => parse_amount(&text),
            Self::Integer(value) => Ok(U256::from(value)),
        }
    }
}

/// Parse a decimal or `0x`-prefixed hex amount.
pub fn parse_amount(text: &str) -> TypesResult<U256> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(text, 10),
    };
    parsed.map_err(|e| TypesError::InvalidAmount(format!("{text}: {e}")))
}

/// Parse a `0x`-prefixed hex address (checksum is not enforced).
pub fn parse_address(text: &str) -> TypesResult<Address> {
    Address::from_str(text.trim()).map_err(|e| TypesError::InvalidAddress(format!("{text}: {e}")))
}

/// `#[serde(with = "amount")]` for a single `U256`.
pub mod amount {
    use super::RawAmount;
    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        RawAmount::deserialize(deserializer)?
            .into_u256()
            .map_err(de::Error::custom)
    }
}

/// `#[serde(with = "amount_map")]` for symbol-keyed balances.
pub mod amount_map {
    use super::RawAmount;
    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(k, v)| (k, v.to_string())))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, U256>, D::Error> {
        BTreeMap::<String, RawAmount>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| v.into_u256().map(|v| (k, v)).map_err(de::Error::custom))
            .collect()
    }
}

/// `#[serde(with = "address")]` for an `Address` encoded as a hex string.
pub mod address {
    use alloy::primitives::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_address(&text).map_err(de::Error::custom)
    }
}
