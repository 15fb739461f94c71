//! Deposit transaction parser
//!
//! Walks the outputs of the bridge's BTC transaction payload (raw transaction
//! or PSBT) and assigns semantic roles by position: output 0 is the vault
//! deposit, output 1 carries the OP_RETURN memo, output 2 is the refund leg.
//!
//! The decoded result feeds the pre-signing review screen only. Parsing is
//! therefore best-effort: malformed payloads produce an empty
//! [`ParsedTransaction`] instead of an error, and the funding flow proceeds
//! without the preview.

use bitcoin::consensus::Decodable;
use bitcoin::{Psbt, Transaction};
use std::io::Cursor;

use crate::bitcoin::script;
use crate::types::{ParsedTransaction, TxOutputInfo};

/// Parse a bridge transaction payload from hex
///
/// Accepts an optional `0x` prefix. Equivalent to [`parse_transaction_bytes`]
/// after hex decoding; undecodable hex yields the empty result.
pub fn parse_transaction_hex(payload: &str) -> ParsedTransaction {
    let trimmed = payload.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    match hex::decode(stripped) {
        Ok(bytes) => parse_transaction_bytes(&bytes),
        Err(e) => {
            log::warn!("Deposit payload is not valid hex: {}", e);
            ParsedTransaction::default()
        }
    }
}

/// Parse a bridge transaction payload from raw bytes
///
/// Tries PSBT first (the bridge's usual encoding), then falls back to a
/// consensus-serialized transaction. Never fails; see the module docs.
pub fn parse_transaction_bytes(payload: &[u8]) -> ParsedTransaction {
    let tx = match decode_transaction(payload) {
        Some(tx) => tx,
        None => {
            log::warn!(
                "Could not decode deposit payload ({} bytes) as PSBT or raw transaction",
                payload.len()
            );
            return ParsedTransaction::default();
        }
    };

    let outputs: Vec<TxOutputInfo> = tx
        .output
        .iter()
        .enumerate()
        .map(|(index, out)| {
            let script_bytes = out.script_pubkey.as_bytes();
            TxOutputInfo {
                index,
                // Address extraction from non-OP_RETURN scripts is not
                // implemented; see `TxOutputInfo::address`
                address: None,
                amount_sats: out.value.to_sat(),
                is_op_return: script::is_op_return(script_bytes),
                script_hex: hex::encode(script_bytes),
            }
        })
        .collect();

    let memo = tx
        .output
        .get(1)
        .filter(|out| script::is_op_return(out.script_pubkey.as_bytes()))
        .and_then(|out| script::decode_memo(out.script_pubkey.as_bytes()));

    let deposit = outputs.first();
    let refund = outputs.get(2);

    ParsedTransaction {
        deposit_address: deposit.and_then(|o| o.address.clone()),
        deposit_amount_sats: deposit.map(|o| o.amount_sats).unwrap_or(0),
        memo,
        refund_address: refund.and_then(|o| o.address.clone()),
        refund_amount_sats: refund.map(|o| o.amount_sats).unwrap_or(0),
        raw_tx_hex: hex::encode(bitcoin::consensus::serialize(&tx)),
        outputs,
    }
}

/// Decode payload bytes as a PSBT's unsigned transaction, or as a raw
/// consensus-serialized transaction
fn decode_transaction(payload: &[u8]) -> Option<Transaction> {
    if let Ok(psbt) = Psbt::deserialize(payload) {
        return Some(psbt.unsigned_tx);
    }

    let mut cursor = Cursor::new(payload);
    match Transaction::consensus_decode(&mut cursor) {
        // Trailing garbage means this was not actually a serialized tx
        Ok(tx) if cursor.position() as usize == payload.len() => Some(tx),
        _ => None,
    }
}
