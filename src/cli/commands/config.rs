//! Config command implementations

use crate::config::{load_config, ConfigError, ConfigOverrides, GlobalConfig, NetworkType};
use crate::types::OutputFormat;

/// Initialize configuration file with network-specific defaults
pub fn init(network: Option<String>) -> Result<(), ConfigError> {
    // Parse network or default to mainnet
    let network_type = match network.as_deref() {
        Some("mainnet") | None => NetworkType::Mainnet,
        Some("testnet") => NetworkType::Testnet,
        Some(n) => {
            return Err(ConfigError::InvalidNetwork(n.to_string()));
        }
    };

    let config = match network_type {
        NetworkType::Mainnet => GlobalConfig::default_mainnet(),
        NetworkType::Testnet => GlobalConfig::default_testnet(),
    };

    // Save to default location
    crate::config::save_config(&config, None)?;

    let config_path = crate::config::default_config_path()?;
    println!("✓ Configuration initialized for {:?}", network_type);
    println!("  Config file: {}", config_path.display());

    Ok(())
}

/// Print the effective configuration after overrides
pub fn show(overrides: ConfigOverrides, format: OutputFormat) -> Result<(), ConfigError> {
    let config = load_config(None, overrides)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Table => {
            println!("Configuration ({:?}):", config.network);
            println!("  Bridge API:            {}", config.bridge.api_url);
            println!(
                "  Advanced-route chain:  {}",
                config.bridge.advanced_route_chain_id
            );
            println!("  Default slippage:      {}", config.bridge.default_slippage);
            println!("  Exchange API:          {}", config.exchange.api_url);
            println!("  Builder address:       {}", config.exchange.builder_address);
            println!("  Max builder fee:       {}", config.exchange.max_builder_fee);
        }
    }

    Ok(())
}
