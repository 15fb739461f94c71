//! Bitcoin decoding layer
//!
//! Handles output-script classification, OP_RETURN memo extraction, and
//! best-effort decoding of bridge deposit transactions for display.

pub mod script;
pub mod transaction;

pub use script::{decode_memo, is_op_return, OP_RETURN};
pub use transaction::{parse_transaction_bytes, parse_transaction_hex};
