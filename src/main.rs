//! btc-funding-wallet CLI
//!
//! Command-line interface for bridge quotes, deposit transaction decoding,
//! and configuration management.

use btc_funding_wallet::bridge::QuoteRequest;
use btc_funding_wallet::cli::args::{Cli, Commands, ConfigAction};
use btc_funding_wallet::cli::commands;
use btc_funding_wallet::config::{ConfigOverrides, NetworkType};
use btc_funding_wallet::types::OutputFormat;
use clap::Parser;
use std::process;

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    // Parse network string to NetworkType
    let network = cli.network.as_ref().and_then(|n| match n.as_str() {
        "testnet" => Some(NetworkType::Testnet),
        "mainnet" => Some(NetworkType::Mainnet),
        _ => {
            eprintln!("Error: Invalid network '{}'. Use: testnet or mainnet", n);
            process::exit(1);
        }
    });

    let format: OutputFormat = match cli.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Env overrides apply first, CLI flags win
    let overrides = ConfigOverrides::from_env().merge(ConfigOverrides {
        network,
        bridge_api_url: cli.bridge_api_url.clone(),
        exchange_api_url: cli.exchange_api_url.clone(),
        builder_address: None,
    });

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init { network } => commands::config::init(network).map_err(Into::into),
            ConfigAction::Show => commands::config::show(overrides, format).map_err(Into::into),
        },

        Commands::DecodeTx { hex } => commands::decode::decode_tx(&hex, format).map_err(Into::into),

        Commands::DecodeMemo { script_hex } => {
            commands::decode::decode_memo_cmd(&script_hex, format).map_err(Into::into)
        }

        Commands::Quote {
            amount,
            to_chain,
            to_token,
            to_address,
            from_address,
            slippage,
        } => {
            let request = QuoteRequest {
                from_btc_address: from_address,
                from_amount_sats: amount,
                to_chain_id: to_chain,
                to_token,
                to_address,
                slippage,
                allow_bridges: None,
            };

            match tokio::runtime::Runtime::new() {
                Ok(rt) => rt
                    .block_on(commands::quote::get_quote(request, overrides, format))
                    .map_err(Into::into),
                Err(e) => Err(format!("Failed to create async runtime: {}", e).into()),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
