//! BTC Funding Wallet
//!
//! Funds a trading account with Bitcoin through a cross-chain bridge and
//! gates access to trading behind a sequence of on-chain/off-chain approvals.
//! Combines a Bitcoin output-script decoder, a bridge quote normalizer, and
//! a token-refreshing authenticated HTTP client.

pub mod api;
pub mod approval;
pub mod bitcoin;
pub mod bridge;
pub mod cache;
pub mod cli;
pub mod config;
pub mod manager;
pub mod signer;
pub mod types;
