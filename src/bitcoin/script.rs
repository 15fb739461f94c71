//! Bitcoin output-script decoder
//!
//! Classifies a single locking script and extracts OP_RETURN memo bytes.
//! Bridge deposits carry their routing instructions in an OP_RETURN output;
//! the payload is either human-readable text (e.g. `=:ETH.USDC`) or opaque
//! binary that may embed a bridge tracking id.
//!
//! Decoding is best-effort display data: this module never returns an error
//! and never panics. Anything it cannot make sense of comes back as hex.

/// OP_RETURN opcode, marks an output as an unspendable data carrier
pub const OP_RETURN: u8 = 0x6a;

/// OP_PUSHDATA1: length in the next 1 byte
const OP_PUSHDATA1: u8 = 0x4c;
/// OP_PUSHDATA2: length in the next 2 bytes, little-endian
const OP_PUSHDATA2: u8 = 0x4d;
/// OP_PUSHDATA4: length in the next 4 bytes, little-endian
const OP_PUSHDATA4: u8 = 0x4e;

/// Fraction of printable bytes above which a payload is rendered as text
const PRINTABLE_THRESHOLD: f64 = 0.7;

/// Check whether a locking script is an OP_RETURN data carrier
pub fn is_op_return(script: &[u8]) -> bool {
    script.first() == Some(&OP_RETURN)
}

/// Decode the memo carried by an OP_RETURN locking script
///
/// Returns `None` for non-OP_RETURN scripts and for OP_RETURN outputs with no
/// payload. Otherwise returns either the payload as text (when mostly
/// printable), or `"0x" + hex`, with an embedded bridge tracking id appended
/// when one is found.
///
/// # Example
///
/// ```
/// use btc_funding_wallet::bitcoin::decode_memo;
///
/// let script = [&[0x6a, 0x04][..], b"ping"].concat();
/// assert_eq!(decode_memo(&script), Some("ping".to_string()));
/// ```
pub fn decode_memo(script: &[u8]) -> Option<String> {
    if !is_op_return(script) {
        return None;
    }
    if script.len() < 2 {
        return None;
    }

    let payload = match extract_push_payload(&script[1..]) {
        Some(p) => p,
        // Unrecognized push encoding: surface whatever follows OP_RETURN
        None => return Some(format!("0x{}", hex::encode(&script[1..]))),
    };

    if payload.is_empty() {
        return None;
    }

    Some(classify_payload(payload))
}

/// Extract the data pushed by the first push opcode of `bytes`
///
/// `bytes` starts at the push opcode (OP_RETURN already consumed). Returns
/// `None` when the opcode is not a data push at all; a declared length that
/// overruns the buffer is clamped to what remains rather than rejected, since
/// truncated memos are still worth showing.
fn extract_push_payload(bytes: &[u8]) -> Option<&[u8]> {
    let opcode = *bytes.first()?;

    let (data_start, declared_len) = match opcode {
        op @ 0x00..=0x4b => (1, op as usize),
        OP_PUSHDATA1 => {
            let len = *bytes.get(1)? as usize;
            (2, len)
        }
        OP_PUSHDATA2 => {
            let lo = *bytes.get(1)?;
            let hi = *bytes.get(2)?;
            (3, u16::from_le_bytes([lo, hi]) as usize)
        }
        OP_PUSHDATA4 => {
            if bytes.len() < 5 {
                return None;
            }
            let len = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
            (5, len)
        }
        _ => return None,
    };

    let remaining = bytes.get(data_start..)?;
    let clamped = declared_len.min(remaining.len());
    Some(&remaining[..clamped])
}

/// Render a memo payload as text or hex depending on its printable ratio
fn classify_payload(payload: &[u8]) -> String {
    let printable = payload
        .iter()
        .filter(|&&b| (0x20..=0x7e).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r')
        .count();

    if printable as f64 / payload.len() as f64 > PRINTABLE_THRESHOLD {
        return String::from_utf8_lossy(payload).into_owned();
    }

    let mut out = format!("0x{}", hex::encode(payload));

    // Binary memos from the bridge often embed an ASCII tracking id; scan a
    // lenient decoding of the same bytes for it
    let lenient = String::from_utf8_lossy(payload);
    if let Some(tracking) = find_tracking_id(&lenient) {
        out.push_str(&format!(" (tracking: {})", tracking));
    }

    out
}

/// Find a bridge tracking id: optional `=`/`|` prefix, `lifi`, then
/// alphanumerics
fn find_tracking_id(text: &str) -> Option<String> {
    let start = text.find("lifi")?;
    let bytes = text.as_bytes();

    let mut end = start + 4;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }

    let prefixed_start = if start > 0 && (bytes[start - 1] == b'=' || bytes[start - 1] == b'|') {
        start - 1
    } else {
        start
    };

    Some(text[prefixed_start..end].to_string())
}
