//! Shared types for btc-funding-wallet
//!
//! Common data structures used across the funding flow.

use serde::{Deserialize, Serialize};

/// One decoded transaction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutputInfo {
    /// Output index within the transaction
    pub index: usize,

    /// Decoded address, if resolvable
    ///
    /// Address extraction from non-OP_RETURN scripts is not implemented and
    /// this is always `None` for now; callers must treat it as informational.
    pub address: Option<String>,

    /// Amount in satoshis
    pub amount_sats: u64,

    /// Whether this output is an OP_RETURN data carrier
    pub is_op_return: bool,

    /// Locking script, hex-encoded
    pub script_hex: String,
}

/// Best-effort decoded view of a deposit transaction
///
/// Roles are assigned strictly by output position: output 0 is the deposit,
/// output 1 (when OP_RETURN) carries the bridge memo, output 2 is the refund
/// leg, and everything after that is a fee leg recorded only in `outputs`.
///
/// This is diagnostic/UI data: a malformed payload produces the `Default`
/// (all-empty) value instead of an error so it can never abort a funding flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// All outputs in index order
    pub outputs: Vec<TxOutputInfo>,

    /// Address of output 0 (the bridge vault deposit)
    pub deposit_address: Option<String>,

    /// Amount of output 0 in satoshis
    pub deposit_amount_sats: u64,

    /// Decoded OP_RETURN memo from output 1, if present
    pub memo: Option<String>,

    /// Address of output 2 (refund leg), if present
    pub refund_address: Option<String>,

    /// Amount of output 2 in satoshis
    pub refund_amount_sats: u64,

    /// Fully serialized unsigned transaction, hex-encoded
    pub raw_tx_hex: String,
}

impl ParsedTransaction {
    /// True when nothing could be decoded from the payload
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Output format for CLI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format (default)
    Table,

    /// JSON format for machine parsing
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format '{}'. Valid options: table, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
