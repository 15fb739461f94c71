//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "btc-funding-wallet",
    version,
    about = "Bitcoin funding wallet - bridge quotes, deposit decoding, and trading approvals",
    long_about = None
)]
pub struct Cli {
    /// Network to use: testnet, mainnet (overrides config)
    #[arg(short, long, global = true)]
    pub network: Option<String>,

    /// Bridge quote API base URL (overrides config)
    #[arg(long, global = true)]
    pub bridge_api_url: Option<String>,

    /// Exchange API base URL (overrides config)
    #[arg(long, global = true)]
    pub exchange_api_url: Option<String>,

    /// Output format: table, json
    #[arg(short, long, global = true, default_value = "table")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize or manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Decode a deposit transaction (raw hex or PSBT)
    DecodeTx {
        /// Transaction payload, hex-encoded (with or without 0x prefix)
        hex: String,
    },

    /// Decode an OP_RETURN script into its memo text
    DecodeMemo {
        /// Full locking script, hex-encoded
        script_hex: String,
    },

    /// Request a funding quote from the bridge
    Quote {
        /// Amount to bridge, in satoshis
        #[arg(short, long)]
        amount: u64,

        /// Destination chain id
        #[arg(long)]
        to_chain: u64,

        /// Destination token address or symbol
        #[arg(long)]
        to_token: String,

        /// Destination address receiving the funds
        #[arg(long)]
        to_address: String,

        /// Bitcoin address spending the deposit
        #[arg(long)]
        from_address: String,

        /// Slippage tolerance as a fraction (e.g. 0.005)
        #[arg(long)]
        slippage: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create a config file with network defaults
    Init {
        /// Network: testnet or mainnet (default: mainnet)
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Print the active configuration
    Show,
}
