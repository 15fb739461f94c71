//! Deposit payload decoding, end to end
//!
//! Builds consensus-serialized transactions by hand (independently of the
//! parser's own serialization path) and decodes them the way the funding flow
//! does: quote transaction data in, reviewed outputs and memo out.

use btc_funding_wallet::bitcoin::{decode_memo, parse_transaction_hex};
use btc_funding_wallet::bridge::{Quote, TransactionRequest};
use btc_funding_wallet::config::GlobalConfig;
use btc_funding_wallet::manager::FundingManager;

/// Serialize a legacy (pre-segwit) transaction with one null input
fn raw_tx(outputs: &[(u64, Vec<u8>)]) -> Vec<u8> {
    let mut tx = Vec::new();
    tx.extend_from_slice(&2u32.to_le_bytes()); // version

    tx.push(0x01); // one input
    tx.extend_from_slice(&[0x00; 32]); // null prevout txid
    tx.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // null prevout index
    tx.push(0x00); // empty script_sig
    tx.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // sequence

    assert!(outputs.len() < 0xfd, "varint beyond one byte not needed here");
    tx.push(outputs.len() as u8);
    for (sats, script) in outputs {
        tx.extend_from_slice(&sats.to_le_bytes());
        assert!(script.len() < 0xfd);
        tx.push(script.len() as u8);
        tx.extend_from_slice(script);
    }

    tx.extend_from_slice(&0u32.to_le_bytes()); // locktime
    tx
}

fn p2wpkh_script() -> Vec<u8> {
    [&[0x00, 0x14][..], &[0xab; 20][..]].concat()
}

fn op_return_script(payload: &[u8]) -> Vec<u8> {
    let mut script = vec![0x6a, payload.len() as u8];
    script.extend_from_slice(payload);
    script
}

fn funding_quote(data_hex: String) -> Quote {
    Quote {
        tool: "relay".to_string(),
        from_amount: "150000".to_string(),
        to_amount: "148000".to_string(),
        to_amount_min: "147000".to_string(),
        to_amount_usd: Some("148.00".to_string()),
        execution_duration: 600.0,
        transaction_request: TransactionRequest {
            to: "bc1qvault".to_string(),
            value: "150000".to_string(),
            data: data_hex,
        },
        included_steps: None,
    }
}

#[test]
fn test_quote_transaction_previews_through_manager() {
    let raw = raw_tx(&[
        (150_000, p2wpkh_script()),
        (0, op_return_script(b"=:ETH.USDC")),
        (25_000, p2wpkh_script()),
    ]);
    let quote = funding_quote(format!("0x{}", hex::encode(&raw)));

    let manager = FundingManager::new(GlobalConfig::default_testnet());
    let preview = manager.preview_transaction(&quote);

    assert_eq!(preview.outputs.len(), 3);
    assert_eq!(preview.deposit_amount_sats, 150_000);
    assert_eq!(preview.memo.as_deref(), Some("=:ETH.USDC"));
    assert_eq!(preview.refund_amount_sats, 25_000);
    assert_eq!(preview.raw_tx_hex, hex::encode(&raw));
}

#[test]
fn test_undecodable_quote_payload_previews_empty() {
    let quote = funding_quote("0xdeadbeef".to_string());

    let manager = FundingManager::new(GlobalConfig::default_testnet());
    let preview = manager.preview_transaction(&quote);

    assert!(preview.is_empty(), "bad payloads must not abort the funding flow");
    assert_eq!(preview.memo, None);
}

#[test]
fn test_parse_then_redecode_memo_from_script_hex() {
    // The reviewed output's script hex feeds back into the memo decoder
    let raw = raw_tx(&[
        (90_000, p2wpkh_script()),
        (0, op_return_script(b"=:ARB.ETH:0xdest")),
    ]);
    let parsed = parse_transaction_hex(&hex::encode(&raw));

    let memo_script = hex::decode(&parsed.outputs[1].script_hex).unwrap();
    assert_eq!(
        decode_memo(&memo_script).as_deref(),
        Some("=:ARB.ETH:0xdest")
    );
    assert_eq!(parsed.memo.as_deref(), Some("=:ARB.ETH:0xdest"));
}

#[test]
fn test_binary_memo_with_tracking_id_survives_full_decode() {
    let mut payload = vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
    payload.extend_from_slice(b"|lifi7f3a91");
    payload.extend_from_slice(&[0x80; 12]);

    let raw = raw_tx(&[
        (200_000, p2wpkh_script()),
        (0, op_return_script(&payload)),
    ]);
    let parsed = parse_transaction_hex(&hex::encode(&raw));

    let memo = parsed.memo.expect("binary memo should decode to hex");
    assert!(memo.starts_with("0x"), "got: {}", memo);
    assert!(memo.contains("(tracking: |lifi7f3a91)"), "got: {}", memo);
}

#[test]
fn test_fee_legs_beyond_refund_are_listed_but_unassigned() {
    let raw = raw_tx(&[
        (100_000, p2wpkh_script()),
        (0, op_return_script(b"memo")),
        (10_000, p2wpkh_script()),
        (1_500, p2wpkh_script()),
        (900, p2wpkh_script()),
    ]);
    let parsed = parse_transaction_hex(&hex::encode(&raw));

    assert_eq!(parsed.outputs.len(), 5);
    assert_eq!(parsed.refund_amount_sats, 10_000);
    // Outputs 3+ carry no role beyond their listing
    assert_eq!(parsed.outputs[3].amount_sats, 1_500);
    assert_eq!(parsed.outputs[4].amount_sats, 900);
}
