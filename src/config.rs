//! Configuration types for the BTC funding wallet
//!
//! Manages global configuration including network selection, bridge quote API
//! endpoints, and exchange (auth) API endpoints.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Chain id the bridge uses for Bitcoin as the source chain
pub const BITCOIN_CHAIN_ID: u64 = 20_000_000_000_001;

/// Token symbol the bridge uses for native Bitcoin
pub const BITCOIN_TOKEN: &str = "bitcoin";

/// Default slippage for BTC-sourced bridge quotes
///
/// BTC bridges require higher slippage than typical EVM swaps due to longer
/// confirmation windows.
pub const DEFAULT_SLIPPAGE: f64 = 0.01;

/// Global wallet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub network: NetworkType,
    pub bridge: BridgeConfig,
    pub exchange: ExchangeConfig,
}

/// Bridge quote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the bridge quote API
    pub api_url: String,

    /// Destination chain id that cannot be reached in a single hop and must
    /// go through the advanced-routes endpoint
    pub advanced_route_chain_id: u64,

    /// Slippage applied when a quote request does not specify one
    pub default_slippage: f64,
}

/// Exchange (auth + approvals) API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Base URL of the exchange REST API
    pub api_url: String,

    /// Builder address whose fee approval gates trading
    pub builder_address: String,

    /// Maximum builder fee (tenths of a basis point) the approval must cover
    pub max_builder_fee: u64,
}

/// Bitcoin network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Testnet,
    Mainnet,
}

impl GlobalConfig {
    /// Create default configuration for mainnet
    pub fn default_mainnet() -> Self {
        Self {
            network: NetworkType::Mainnet,
            bridge: BridgeConfig {
                api_url: "https://li.quest/v1".to_string(),
                advanced_route_chain_id: 999,
                default_slippage: DEFAULT_SLIPPAGE,
            },
            exchange: ExchangeConfig {
                api_url: "https://api.hyperliquid.xyz".to_string(),
                builder_address: String::new(),
                max_builder_fee: 10,
            },
        }
    }

    /// Create default configuration for testnet
    pub fn default_testnet() -> Self {
        Self {
            network: NetworkType::Testnet,
            bridge: BridgeConfig {
                api_url: "https://staging.li.quest/v1".to_string(),
                advanced_route_chain_id: 998,
                default_slippage: DEFAULT_SLIPPAGE,
            },
            exchange: ExchangeConfig {
                api_url: "https://api.hyperliquid-testnet.xyz".to_string(),
                builder_address: String::new(),
                max_builder_fee: 10,
            },
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::default_mainnet()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Config directory not found")]
    DirectoryNotFound,
}

/// Configuration overrides from CLI arguments or environment variables
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub network: Option<NetworkType>,
    pub bridge_api_url: Option<String>,
    pub exchange_api_url: Option<String>,
    pub builder_address: Option<String>,
}

impl ConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create overrides from environment variables
    pub fn from_env() -> Self {
        Self {
            network: std::env::var("BITCOIN_NETWORK").ok().and_then(|s| {
                match s.to_lowercase().as_str() {
                    "testnet" => Some(NetworkType::Testnet),
                    "mainnet" => Some(NetworkType::Mainnet),
                    _ => None,
                }
            }),
            bridge_api_url: std::env::var("BRIDGE_API_URL").ok(),
            exchange_api_url: std::env::var("EXCHANGE_API_URL").ok(),
            builder_address: std::env::var("BUILDER_ADDRESS").ok(),
        }
    }

    /// Merge with another set of overrides (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.network.is_some() {
            self.network = other.network;
        }
        if other.bridge_api_url.is_some() {
            self.bridge_api_url = other.bridge_api_url;
        }
        if other.exchange_api_url.is_some() {
            self.exchange_api_url = other.exchange_api_url;
        }
        if other.builder_address.is_some() {
            self.builder_address = other.builder_address;
        }
        self
    }
}

/// Get the default configuration directory path
///
/// Returns: `~/.btc-funding-wallet/`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".btc-funding-wallet"))
        .ok_or(ConfigError::DirectoryNotFound)
}

/// Get the default configuration file path
///
/// Returns: `~/.btc-funding-wallet/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("config.json"))
}

/// Load configuration from file with overrides
///
/// # Priority (highest to lowest):
/// 1. CLI overrides (passed as argument)
/// 2. Environment variables
/// 3. Config file
/// 4. Network defaults
///
/// # Arguments
///
/// * `config_path` - Path to config file (optional, uses default if None)
/// * `cli_overrides` - Overrides from CLI arguments
pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: ConfigOverrides,
) -> Result<GlobalConfig, ConfigError> {
    // Determine config path
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    // Start with network defaults
    let mut config = if path.exists() {
        // Load from file if it exists
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)?
    } else {
        match cli_overrides.network {
            Some(NetworkType::Testnet) => GlobalConfig::default_testnet(),
            _ => GlobalConfig::default_mainnet(),
        }
    };

    // Apply environment variable overrides
    let env_overrides = ConfigOverrides::from_env();
    apply_overrides(&mut config, env_overrides);

    // Apply CLI overrides (highest priority)
    apply_overrides(&mut config, cli_overrides);

    if config.bridge.default_slippage <= 0.0 || config.bridge.default_slippage >= 1.0 {
        return Err(ConfigError::Invalid(format!(
            "default_slippage must be in (0, 1), got {}",
            config.bridge.default_slippage
        )));
    }

    Ok(config)
}

/// Save configuration to file
///
/// Creates parent directories if they don't exist.
///
/// # Arguments
///
/// * `config` - Configuration to save
/// * `config_path` - Path to save config (optional, uses default if None)
pub fn save_config(config: &GlobalConfig, config_path: Option<&Path>) -> Result<(), ConfigError> {
    // Determine config path
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Serialize to pretty JSON
    let json = serde_json::to_string_pretty(config)?;

    // Write to file
    std::fs::write(&path, json)?;

    Ok(())
}

/// Apply configuration overrides (internal helper)
fn apply_overrides(config: &mut GlobalConfig, overrides: ConfigOverrides) {
    // Network override swaps in that network's default endpoints unless they
    // are themselves overridden
    if let Some(network) = overrides.network {
        if config.network != network {
            let defaults = match network {
                NetworkType::Mainnet => GlobalConfig::default_mainnet(),
                NetworkType::Testnet => GlobalConfig::default_testnet(),
            };
            config.network = network;
            if overrides.bridge_api_url.is_none() {
                config.bridge = defaults.bridge;
            }
            if overrides.exchange_api_url.is_none() {
                config.exchange.api_url = defaults.exchange.api_url;
            }
        }
    }

    if let Some(url) = overrides.bridge_api_url {
        config.bridge.api_url = url;
    }
    if let Some(url) = overrides.exchange_api_url {
        config.exchange.api_url = url;
    }
    if let Some(addr) = overrides.builder_address {
        config.exchange.builder_address = addr;
    }
}
