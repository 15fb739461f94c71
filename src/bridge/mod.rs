//! Bridge quote layer
//!
//! Obtains cross-chain quotes for BTC deposits and reduces single-step and
//! multi-step routes to one canonical [`Quote`] shape.

pub mod quote;
pub mod types;

pub use quote::{QuoteClient, QuoteError};
pub use types::{Quote, QuoteRequest, Route, Step, TransactionRequest};
