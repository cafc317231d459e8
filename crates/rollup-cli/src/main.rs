//! Rollup client CLI - Entry Point
//!
//! Connects a provider per the configuration, runs one query and prints the
//! result as pretty JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollup_provider::{ChainProxy, Provider, ProviderConfig, TransportKind};
use rollup_transport::HttpTransport;
use rollup_types::{Address, Milestone, TokenLike, TxFeeType};
use serde::Serialize;
use tracing::info;

/// Rollup JSON-RPC client
#[derive(Parser, Debug)]
#[command(name = "rollup", version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ROLLUP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Network override (localhost, rinkeby, ropsten, mainnet)
    #[arg(short, long)]
    network: Option<String>,

    /// Transport override (ws, http)
    #[arg(short, long)]
    transport: Option<TransportKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Base-chain contract addresses
    Contracts,
    /// Registered tokens
    Tokens,
    /// Account state (committed and verified)
    Account { address: Address },
    /// Transaction receipt
    Tx {
        hash: String,
        /// Block until the milestone is reached (commit, verify)
        #[arg(long)]
        wait: Option<Milestone>,
    },
    /// Priority operation receipt
    PriorityOp {
        serial_id: u64,
        /// Block until the milestone is reached (commit, verify)
        #[arg(long)]
        wait: Option<Milestone>,
    },
    /// Fee quote for a transaction
    Fee {
        /// withdraw or transfer
        tx_type: TxFeeType,
        address: Address,
        /// Symbol or contract address
        token: TokenLike,
    },
    /// Current token price
    Price { token: TokenLike },
    /// Base-chain confirmations required for priority operations
    Confirmations,
    /// Rollup token id of a base-chain token (needs eth_rpc_url)
    TokenId { address: Address },
}

fn load_config(args: &Args) -> Result<ProviderConfig> {
    let config = match &args.config {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            ProviderConfig::from_file(path)?
        }
        None => ProviderConfig::load()?,
    };
    Ok(apply_overrides(config, args))
}

/// Command-line flags win over the file; a network override drops any explicit endpoint.
fn apply_overrides(mut config: ProviderConfig, args: &Args) -> ProviderConfig {
    if let Some(network) = &args.network {
        config.network = network.clone();
        config.endpoint = None;
    }
    if let Some(transport) = args.transport {
        config.transport = transport;
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, provider: &Provider, config: &ProviderConfig) -> Result<()> {
    match command {
        Command::Contracts => print_json(provider.contract_address()),
        Command::Tokens => print_json(provider.token_set().tokens()),
        Command::Account { address } => print_json(&provider.get_state(address).await?),
        Command::Tx { hash, wait } => {
            let receipt = match wait {
                Some(milestone) => provider.notify_transaction(&hash, milestone).await?,
                None => provider.get_tx_receipt(&hash).await?,
            };
            print_json(&receipt)
        }
        Command::PriorityOp { serial_id, wait } => {
            let receipt = match wait {
                Some(milestone) => provider.notify_priority_op(serial_id, milestone).await?,
                None => provider.get_priority_op_status(serial_id).await?,
            };
            print_json(&receipt)
        }
        Command::Fee {
            tx_type,
            address,
            token,
        } => print_json(&provider.get_transaction_fee(tx_type, address, &token).await?),
        Command::Price { token } => {
            let price = provider.get_token_price(&token).await?;
            print_json(&serde_json::json!({ "token": token, "price": price }))
        }
        Command::Confirmations => print_json(&provider.get_confirmations_for_eth_op_amount().await?),
        Command::TokenId { address } => {
            let eth_rpc_url = config
                .eth_rpc_url
                .clone()
                .context("token-id needs eth_rpc_url in the configuration")?;
            let eth_transport = HttpTransport::new(eth_rpc_url)?;
            let proxy = ChainProxy::over_rpc(Box::new(eth_transport), *provider.contract_address());
            let id = proxy.resolve_token_id(address).await?;
            print_json(&serde_json::json!({ "token": address.to_string(), "id": id }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any wss connections)
    rollup_transport::init_crypto();

    let args = Args::parse();

    rollup_telemetry::init_logging()?;

    let config = load_config(&args)?;
    info!(
        network = %config.network,
        transport = %config.transport,
        endpoint = ?config.endpoint,
        "Configuration loaded"
    );

    let provider = Provider::connect(&config).await?;
    let result = run(args.command, &provider, &config).await;
    provider.disconnect().await?;
    result
}
