//! Token registry types.
//!
//! The `tokens` RPC returns a symbol-keyed map of token records. `TokenSet`
//! wraps that snapshot and resolves a `TokenLike` (symbol or address) to its
//! id, address, symbol, or decimals.

use crate::error::{TypesError, TypesResult};
use crate::serde_ext;
use alloy::primitives::{Address, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Symbol of the chain's native asset.
pub const ETH_SYMBOL: &str = "ETH";

/// Token metadata as registered on the rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Base-chain contract address (zero address for the native asset).
    #[serde(with = "serde_ext::address")]
    pub address: Address,
    /// Rollup-internal token id.
    pub id: u16,
    /// Ticker symbol (e.g., "ETH", "DAI").
    pub symbol: String,
    /// Number of decimal places of the smallest unit.
    pub decimals: u8,
}

/// Raw `tokens` response: symbol -> token.
pub type Tokens = BTreeMap<String, Token>;

/// Token reference accepted by the RPC: either a symbol or a contract address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenLike {
    Symbol(String),
    Address(Address),
}

impl FromStr for TokenLike {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("0x") {
            if let Ok(address) = Address::from_str(s) {
                return Ok(Self::Address(address));
            }
        }
        Ok(Self::Symbol(s.to_string()))
    }
}

impl From<&str> for TokenLike {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(token) => token,
            Err(never) => match never {},
        }
    }
}

impl From<Address> for TokenLike {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl std::fmt::Display for TokenLike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::Address(address) => write!(f, "{address}"),
        }
    }
}

impl Serialize for TokenLike {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenLike {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Check whether a token reference denotes the native asset.
///
/// True for the `ETH` symbol and for the zero address.
pub fn is_token_eth(token: &TokenLike) -> bool {
    match token {
        TokenLike::Symbol(symbol) => symbol == ETH_SYMBOL,
        TokenLike::Address(address) => *address == Address::ZERO,
    }
}

/// Immutable snapshot of the token registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens_by_symbol: Tokens,
}

impl TokenSet {
    /// Create a token set from a `tokens` response.
    pub fn new(tokens: Tokens) -> Self {
        Self {
            tokens_by_symbol: tokens,
        }
    }

    /// All tokens keyed by symbol.
    pub fn tokens(&self) -> &Tokens {
        &self.tokens_by_symbol
    }

    pub fn len(&self) -> usize {
        self.tokens_by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens_by_symbol.is_empty()
    }

    /// Look up a token by symbol or address.
    ///
    /// Address matching is byte-wise, so checksum casing does not matter.
    pub fn resolve(&self, token: &TokenLike) -> TypesResult<&Token> {
        let found = match token {
            TokenLike::Symbol(symbol) => self.tokens_by_symbol.get(symbol),
            TokenLike::Address(address) => self
                .tokens_by_symbol
                .values()
                .find(|t| t.address == *address),
        };
        found.ok_or_else(|| TypesError::TokenNotSupported(token.to_string()))
    }

    pub fn resolve_token_id(&self, token: &TokenLike) -> TypesResult<u16> {
        self.resolve(token).map(|t| t.id)
    }

    pub fn resolve_token_address(&self, token: &TokenLike) -> TypesResult<Address> {
        self.resolve(token).map(|t| t.address)
    }

    pub fn resolve_token_symbol(&self, token: &TokenLike) -> TypesResult<&str> {
        self.resolve(token).map(|t| t.symbol.as_str())
    }

    pub fn resolve_token_decimals(&self, token: &TokenLike) -> TypesResult<u8> {
        self.resolve(token).map(|t| t.decimals)
    }

    /// Format a smallest-unit amount as a human-readable decimal string.
    pub fn format_token(&self, token: &TokenLike, amount: U256) -> TypesResult<String> {
        format_units(amount, self.resolve_token_decimals(token)?)
    }

    /// Parse a human-readable decimal string into smallest units.
    pub fn parse_token(&self, token: &TokenLike, amount: &str) -> TypesResult<U256> {
        parse_units(amount, self.resolve_token_decimals(token)?)
    }
}

fn unit_base(decimals: u8) -> TypesResult<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| TypesError::InvalidAmount(format!("{decimals} decimals overflow U256")))
}

/// Format `amount` with `decimals` fractional digits.
///
/// Trailing zeros are trimmed but at least one fractional digit is kept
/// (`1500000` with 6 decimals -> `"1.5"`, `2000000` -> `"2.0"`).
pub fn format_units(amount: U256, decimals: u8) -> TypesResult<String> {
    let base = unit_base(decimals)?;
    let whole = amount / base;
    let fraction = amount % base;

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{whole}.0"))
    } else {
        Ok(format!("{whole}.{fraction}"))
    }
}

/// Parse a decimal string into an integer amount scaled by `decimals`.
pub fn parse_units(amount: &str, decimals: u8) -> TypesResult<U256> {
    let text = amount.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(TypesError::InvalidAmount(amount.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(TypesError::InvalidAmount(format!(
            "{amount}: more than {decimals} fractional digits"
        )));
    }

    let digits = format!("{whole}{fraction:0<width$}", width = decimals as usize);
    U256::from_str_radix(&digits, 10).map_err(|e| TypesError::InvalidAmount(format!("{amount}: {e}")))
}
