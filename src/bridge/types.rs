//! Bridge API wire types and the canonical quote
//!
//! The bridge API is an untyped JSON service; every endpoint response is
//! parsed into an explicit struct at the boundary so malformed payloads fail
//! closed with a typed error instead of flowing through as loose values.
//! Field names follow the wire's camelCase; amounts are decimal strings as
//! sent by the API.

use serde::{Deserialize, Serialize};

/// Parameters for one funding quote
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// User's BTC address (source of funds and refund target)
    pub from_btc_address: String,

    /// Deposit size in satoshis
    pub from_amount_sats: u64,

    /// Destination chain id
    pub to_chain_id: u64,

    /// Destination token contract address
    pub to_token: String,

    /// Destination wallet address
    pub to_address: String,

    /// Maximum tolerated output deviation; defaults per config when unset
    pub slippage: Option<f64>,

    /// Restrict routing to these bridges, if set
    pub allow_bridges: Option<Vec<String>>,
}

/// Transaction the user must sign and broadcast
///
/// `to` is the bridge vault address, `value` the satoshi amount, `data` the
/// PSBT/memo payload decoded for display by the transaction parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub to: String,
    pub value: String,
    pub data: String,
}

/// Per-step amount and duration estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEstimate {
    pub from_amount: String,
    pub to_amount: String,
    pub to_amount_min: String,
    #[serde(rename = "toAmountUSD")]
    pub to_amount_usd: Option<String>,
    /// Seconds
    pub execution_duration: f64,
}

/// What a step does (chains, tokens, amounts)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAction {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub from_token: serde_json::Value,
    pub to_token: serde_json::Value,
    pub from_amount: String,
    pub slippage: Option<f64>,
}

/// One on-chain or bridge action within a route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: Option<String>,
    pub tool: String,
    pub tool_details: Option<serde_json::Value>,
    pub action: StepAction,
    pub estimate: StepEstimate,
    pub transaction_request: Option<TransactionRequest>,
    #[serde(default)]
    pub included_steps: Option<Vec<serde_json::Value>>,
}

/// An ordered multi-step transfer path with route-level output totals
///
/// Exists only transiently inside quote normalization; callers only ever see
/// the canonical [`Quote`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Option<String>,
    pub from_amount: String,
    pub to_amount: String,
    pub to_amount_min: String,
    #[serde(rename = "toAmountUSD")]
    pub to_amount_usd: Option<String>,
    pub to_chain_id: Option<u64>,
    pub to_token: Option<serde_json::Value>,
    pub steps: Vec<Step>,
}

/// Response of `POST /advanced/routes`
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Canonical quote, identical for single-hop and multi-hop destinations
///
/// Invariant: `to_amount_min <= to_amount` (validated at normalization).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Bridge/tool executing the user-signed leg
    pub tool: String,
    pub from_amount: String,
    pub to_amount: String,
    pub to_amount_min: String,
    #[serde(rename = "toAmountUSD")]
    pub to_amount_usd: Option<String>,
    /// Total expected duration across all steps, in seconds
    pub execution_duration: f64,
    pub transaction_request: TransactionRequest,
    /// Remaining legs for multi-hop routes (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_steps: Option<Vec<serde_json::Value>>,
}

impl Quote {
    /// Satoshi amount the user is asked to sign, if well-formed
    pub fn value_sats(&self) -> Option<u64> {
        self.transaction_request.value.parse().ok()
    }
}
