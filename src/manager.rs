//! Funding manager - Main integration layer
//!
//! Coordinates between config, the bridge quote API, the exchange API, and
//! the transaction signer.

use std::time::Duration;

use crate::api::{ApiError, AuthApi, AuthenticatedClient, Eip712Message, SessionStore};
use crate::approval::{
    ApprovalChecker, ApprovalContext, ApprovalError, ApprovalState, ExchangeApprovalSource,
};
use crate::bitcoin::parse_transaction_hex;
use crate::bridge::{Quote, QuoteClient, QuoteError, QuoteRequest};
use crate::config::{ConfigError, GlobalConfig};
use crate::signer::{SignerError, TransactionSigner};
use crate::types::ParsedTransaction;

/// Errors that can occur in the funding manager
#[derive(Debug, thiserror::Error)]
pub enum FundingError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Approval error: {0}")]
    Approval(#[from] ApprovalError),

    #[error("No transaction signer configured")]
    SignerNotConfigured,

    #[error("No wallet connected")]
    WalletNotConnected,
}

/// Result of a completed funding flow
#[derive(Debug, Clone)]
pub struct FundingResult {
    /// Broadcast transaction id
    pub txid: String,

    /// The quote that was executed
    pub quote: Quote,
}

/// Main funding manager
///
/// Owns the shared session and the API clients, and wires quotes, approvals,
/// and signing into one flow.
pub struct FundingManager {
    /// Global configuration
    config: GlobalConfig,

    /// Bridge quote client
    quote_client: QuoteClient,

    /// Exchange auth endpoints
    auth_api: AuthApi,

    /// Approval gate queries against the exchange
    approval_checker: ApprovalChecker<ExchangeApprovalSource>,

    /// Session shared by all exchange calls
    session: SessionStore,

    /// Signer for deposit transactions (if any)
    signer: Option<Box<dyn TransactionSigner>>,

    /// Connected wallet address (if any)
    wallet_address: Option<String>,
}

impl FundingManager {
    /// Create a new funding manager
    ///
    /// Builds the bridge and exchange clients from the configured base URLs.
    /// The exchange clients share one [`SessionStore`], so a login through
    /// [`FundingManager::login`] authenticates approval queries too.
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    ///
    /// # Example
    ///
    /// ```ignore
    /// use btc_funding_wallet::manager::FundingManager;
    /// use btc_funding_wallet::config::GlobalConfig;
    ///
    /// let config = GlobalConfig::default_mainnet();
    /// let manager = FundingManager::new(config);
    /// ```
    pub fn new(config: GlobalConfig) -> Self {
        let session = SessionStore::new();

        // Quote endpoints are unauthenticated; the client still goes through
        // the same retry path
        let bridge_client =
            AuthenticatedClient::new(&config.bridge.api_url, SessionStore::new());
        let quote_client = QuoteClient::new(bridge_client, config.bridge.clone());

        let exchange_client =
            AuthenticatedClient::new(&config.exchange.api_url, session.clone());
        let auth_api = AuthApi::new(exchange_client.clone());
        let source = ExchangeApprovalSource::new(exchange_client, &config.exchange);
        let approval_checker = ApprovalChecker::new(source, &config.exchange);

        Self {
            config,
            quote_client,
            auth_api,
            approval_checker,
            session,
            signer: None,
            wallet_address: None,
        }
    }

    /// Attach a transaction signer
    pub fn with_signer(mut self, signer: Box<dyn TransactionSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Mark a wallet as connected
    pub fn connect_wallet(&mut self, address: impl Into<String>) {
        self.wallet_address = Some(address.into());
    }

    /// Forget the connected wallet and drop the session
    pub fn disconnect_wallet(&mut self) {
        self.wallet_address = None;
        self.session.clear();
    }

    /// The active configuration
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Connected wallet address, if any
    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    /// Fetch the EIP-712 login message for the connected wallet
    pub async fn login_message(&self) -> Result<Eip712Message, FundingError> {
        let address = self.require_wallet()?;
        Ok(self.auth_api.eip712_message(address).await?)
    }

    /// Exchange a signed login message for a session
    pub async fn login(&self, signature: &str, nonce: &str) -> Result<(), FundingError> {
        let address = self.require_wallet()?;
        self.auth_api.login(address, signature, nonce).await?;
        Ok(())
    }

    /// End the session, locally and server-side
    pub async fn logout(&self) -> Result<(), FundingError> {
        Ok(self.auth_api.logout().await?)
    }

    /// Request a funding quote from the bridge
    pub async fn request_quote(&self, request: &QuoteRequest) -> Result<Quote, FundingError> {
        Ok(self.quote_client.get_quote(request).await?)
    }

    /// Decode the deposit transaction a quote asks the wallet to sign
    ///
    /// Decoding never fails; a quote without a transaction or with an
    /// undecodable payload yields an empty [`ParsedTransaction`].
    pub fn preview_transaction(&self, quote: &Quote) -> ParsedTransaction {
        parse_transaction_hex(&quote.transaction_request.data)
    }

    /// Execute a quote: sign and broadcast its deposit transaction
    pub async fn fund(&self, quote: &Quote) -> Result<FundingResult, FundingError> {
        let signer = self.signer.as_ref().ok_or(FundingError::SignerNotConfigured)?;

        let txid = signer.sign_and_broadcast(&quote.transaction_request).await?;
        log::info!("Funding transaction broadcast: {}", txid);

        Ok(FundingResult {
            txid,
            quote: quote.clone(),
        })
    }

    /// Re-derive the approval gating state
    ///
    /// `agent_address` is the agent key expected in the user's approved list.
    pub async fn approval_state(
        &self,
        agent_address: Option<&str>,
    ) -> Result<ApprovalState, FundingError> {
        let ctx = self.approval_context(agent_address);
        Ok(self.approval_checker.compute_state(&ctx).await?)
    }

    /// Last derived approval state, if fresh enough to display
    pub fn cached_approval_state(
        &self,
        agent_address: Option<&str>,
        ttl: Duration,
    ) -> Option<ApprovalState> {
        let ctx = self.approval_context(agent_address);
        self.approval_checker.cached_state(&ctx, ttl)
    }

    fn approval_context(&self, agent_address: Option<&str>) -> ApprovalContext {
        ApprovalContext {
            wallet_connected: self.wallet_address.is_some(),
            has_access_token: self.session.is_authenticated(),
            user_address: self.wallet_address.clone(),
            agent_address: agent_address.map(str::to_string),
        }
    }

    fn require_wallet(&self) -> Result<&str, FundingError> {
        self.wallet_address
            .as_deref()
            .ok_or(FundingError::WalletNotConnected)
    }
}
