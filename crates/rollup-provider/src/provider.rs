//! Provider façade over a rollup transport.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::network::TransportKind;
use crate::waiter::{ConfirmationWaiter, WatchTarget, DEFAULT_POLL_INTERVAL};
use rollup_transport::{HttpConfig, HttpTransport, Transport, WsTransport};
use rollup_types::{
    AccountState, Address, ContractAddress, Fee, Milestone, PriorityOperationReceipt, TokenLike,
    TokenSet, Tokens, TransactionReceipt, TxEthSignature, TxFeeType,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Decode an RPC result into its typed shape.
pub(crate) fn decode<T: DeserializeOwned>(method: &str, value: Value) -> ProviderResult<T> {
    serde_json::from_value(value).map_err(|e| ProviderError::Decode {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

async fn call<T: DeserializeOwned>(
    transport: &dyn Transport,
    method: &str,
    params: Value,
) -> ProviderResult<T> {
    debug!(method, "RPC call");
    let raw = transport.request(method, params).await?;
    decode(method, raw)
}

/// Typed access to the rollup.
///
/// Construction fetches the contract registry and the token set; if either
/// fetch fails no provider is returned. Both snapshots stay fixed for the
/// provider's lifetime. The transport is owned exclusively; concurrent
/// operations on one provider are independent correlated requests.
pub struct Provider {
    transport: Box<dyn Transport>,
    contract_address: ContractAddress,
    token_set: TokenSet,
    poll_interval: Duration,
}

impl Provider {
    /// Build a provider over `transport` with the default poll interval.
    pub async fn new(transport: Box<dyn Transport>) -> ProviderResult<Self> {
        Self::with_poll_interval(transport, DEFAULT_POLL_INTERVAL).await
    }

    /// Build a provider with a custom confirmation poll interval.
    pub async fn with_poll_interval(
        transport: Box<dyn Transport>,
        poll_interval: Duration,
    ) -> ProviderResult<Self> {
        let contract_address: ContractAddress =
            call(transport.as_ref(), "contract_address", Value::Null).await?;
        let tokens: Tokens = call(transport.as_ref(), "tokens", Value::Null).await?;

        info!(
            main_contract = %contract_address.main_contract,
            gov_contract = %contract_address.gov_contract,
            tokens = tokens.len(),
            streaming = transport.subscriptions_supported(),
            "Provider initialized"
        );

        Ok(Self {
            transport,
            contract_address,
            token_set: TokenSet::new(tokens),
            poll_interval,
        })
    }

    /// Provider over a plain HTTP transport.
    pub async fn new_http_provider(url: impl Into<String>) -> ProviderResult<Self> {
        let transport = HttpTransport::new(url)?;
        Self::new(Box::new(transport)).await
    }

    /// Provider over a WebSocket transport.
    pub async fn new_websocket_provider(url: impl Into<String>) -> ProviderResult<Self> {
        let transport = WsTransport::connect(url).await?;
        Self::new(Box::new(transport)).await
    }

    /// Provider described by a configuration.
    pub async fn connect(config: &ProviderConfig) -> ProviderResult<Self> {
        let (kind, url) = config.resolve_endpoint()?;
        info!(%kind, url = %url, "Connecting provider");

        let transport: Box<dyn Transport> = match kind {
            TransportKind::Http => Box::new(HttpTransport::with_config(HttpConfig {
                url,
                request_timeout: config.request_timeout(),
            })?),
            TransportKind::Ws => Box::new(WsTransport::connect(url).await?),
        };
        Self::with_poll_interval(transport, config.poll_interval()).await
    }

    /// Contract registry fetched at construction.
    pub fn contract_address(&self) -> &ContractAddress {
        &self.contract_address
    }

    /// Token set fetched at construction.
    pub fn token_set(&self) -> &TokenSet {
        &self.token_set
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ProviderResult<T> {
        call(self.transport.as_ref(), method, params).await
    }

    /// Submit a transaction; returns its hash (e.g. `sync-tx:dead..beef`).
    pub async fn submit_tx<T: Serialize>(
        &self,
        tx: &T,
        signature: Option<&TxEthSignature>,
    ) -> ProviderResult<String> {
        let tx = serde_json::to_value(tx).map_err(|e| ProviderError::Decode {
            method: "tx_submit".to_string(),
            reason: format!("unencodable transaction: {e}"),
        })?;
        self.call("tx_submit", json!([tx, signature])).await
    }

    /// Fetch the contract registry (live call, not the cached snapshot).
    pub async fn get_contract_address(&self) -> ProviderResult<ContractAddress> {
        self.call("contract_address", Value::Null).await
    }

    /// Fetch the token list (live call, not the cached snapshot).
    pub async fn get_tokens(&self) -> ProviderResult<Tokens> {
        self.call("tokens", Value::Null).await
    }

    pub async fn get_state(&self, address: Address) -> ProviderResult<AccountState> {
        self.call("account_info", json!([address.to_string()])).await
    }

    pub async fn get_tx_receipt(&self, tx_hash: &str) -> ProviderResult<TransactionReceipt> {
        self.call("tx_info", json!([tx_hash])).await
    }

    pub async fn get_priority_op_status(
        &self,
        serial_id: u64,
    ) -> ProviderResult<PriorityOperationReceipt> {
        self.call("ethop_info", json!([serial_id])).await
    }

    /// Base-chain confirmations required before a priority operation is processed.
    pub async fn get_confirmations_for_eth_op_amount(&self) -> ProviderResult<u64> {
        self.call("get_confirmations_for_eth_op_amount", json!([])).await
    }

    fn waiter(&self) -> ConfirmationWaiter<'_> {
        ConfirmationWaiter::new(self.transport.as_ref(), self.poll_interval)
    }

    /// Wait until a priority operation reaches `milestone`.
    pub async fn notify_priority_op(
        &self,
        serial_id: u64,
        milestone: Milestone,
    ) -> ProviderResult<PriorityOperationReceipt> {
        self.waiter()
            .wait(&WatchTarget::priority_op(serial_id), milestone)
            .await
    }

    /// Wait until a transaction reaches `milestone`.
    pub async fn notify_transaction(
        &self,
        hash: &str,
        milestone: Milestone,
    ) -> ProviderResult<TransactionReceipt> {
        self.waiter()
            .wait(&WatchTarget::transaction(hash), milestone)
            .await
    }

    pub async fn get_transaction_fee(
        &self,
        tx_type: TxFeeType,
        address: Address,
        token: &TokenLike,
    ) -> ProviderResult<Fee> {
        self.call(
            "get_tx_fee",
            json!([tx_type, address.to_string(), token]),
        )
        .await
    }

    /// Current token price, decoded as floating point.
    pub async fn get_token_price(&self, token: &TokenLike) -> ProviderResult<f64> {
        let raw: Value = self.call("get_token_price", json!([token])).await?;
        parse_price(&raw)
    }

    pub async fn disconnect(&self) -> ProviderResult<()> {
        self.transport.disconnect().await?;
        Ok(())
    }
}

fn parse_price(raw: &Value) -> ProviderResult<f64> {
    let invalid = |reason: String| ProviderError::Decode {
        method: "get_token_price".to_string(),
        reason,
    };
    match raw {
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(format!("{text}: {e}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{n} is not representable"))),
        other => Err(invalid(format!("expected string, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!("1834.25")).unwrap(), 1834.25);
        assert_eq!(parse_price(&json!(2.5)).unwrap(), 2.5);
        assert!(matches!(
            parse_price(&json!("abc")),
            Err(ProviderError::Decode { .. })
        ));
        assert!(parse_price(&Value::Null).is_err());
    }

    #[test]
    fn test_decode_error_names_method() {
        let err = decode::<u64>("tokens", json!("nope")).unwrap_err();
        match err {
            ProviderError::Decode { method, .. } => assert_eq!(method, "tokens"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
