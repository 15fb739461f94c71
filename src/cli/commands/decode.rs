//! Decode command implementations
//!
//! Offline inspection of deposit transactions and OP_RETURN memos.

use crate::bitcoin::{decode_memo, parse_transaction_hex};
use crate::types::{OutputFormat, ParsedTransaction};

#[derive(Debug, thiserror::Error)]
pub enum DecodeCommandError {
    #[error("Invalid script hex: {0}")]
    InvalidScriptHex(#[from] hex::FromHexError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Decode a deposit transaction payload and print its outputs
pub fn decode_tx(hex_payload: &str, format: OutputFormat) -> Result<(), DecodeCommandError> {
    let parsed = parse_transaction_hex(hex_payload);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        OutputFormat::Table => print_parsed(&parsed),
    }

    Ok(())
}

/// Decode an OP_RETURN locking script into its memo
pub fn decode_memo_cmd(script_hex: &str, format: OutputFormat) -> Result<(), DecodeCommandError> {
    let script = hex::decode(script_hex.trim_start_matches("0x"))?;
    let memo = decode_memo(&script);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "memo": memo }))?);
        }
        OutputFormat::Table => match memo {
            Some(m) => println!("Memo: {}", m),
            None => println!("Not an OP_RETURN script"),
        },
    }

    Ok(())
}

fn print_parsed(parsed: &ParsedTransaction) {
    if parsed.is_empty() {
        println!("Could not decode transaction payload");
        return;
    }

    println!("Decoded transaction ({} outputs):", parsed.outputs.len());
    for output in &parsed.outputs {
        let kind = if output.is_op_return { "OP_RETURN" } else { "value" };
        println!(
            "  [{}] {:>12} sats  {}  script={}",
            output.index, output.amount_sats, kind, output.script_hex
        );
    }

    println!();
    println!("  Deposit: {} sats", parsed.deposit_amount_sats);
    if let Some(memo) = &parsed.memo {
        println!("  Memo:    {}", memo);
    }
    if parsed.refund_amount_sats > 0 {
        println!("  Refund:  {} sats", parsed.refund_amount_sats);
    }
}
