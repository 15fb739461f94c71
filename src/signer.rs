//! Signing collaborator contract
//!
//! The wallet that signs and broadcasts BTC transactions is external to this
//! crate; only its contract is defined here. Implementations are injected
//! into the [`FundingManager`](crate::manager::FundingManager).

use async_trait::async_trait;

use crate::bridge::TransactionRequest;

/// Errors a signer can report
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The user declined the signature prompt
    #[error("Signature rejected by user")]
    Rejected,

    #[error("Signing failed: {0}")]
    Failed(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// Signs and broadcasts the bridge deposit transaction
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Sign `request` (vault address, satoshi value, PSBT payload) and
    /// broadcast it, returning the transaction id
    async fn sign_and_broadcast(&self, request: &TransactionRequest)
        -> Result<String, SignerError>;
}
