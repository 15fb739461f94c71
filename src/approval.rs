//! Approval state machine
//!
//! Trading unlocks only after the wallet is connected, a session exists, and
//! two approvals are in place: the builder-fee approval and the agent-wallet
//! approval. The gating state is a pure derivation over four booleans, never
//! a stored field, so it cannot drift from the authoritative sources.
//!
//! Both approval gates are re-derived on every computation by querying the
//! authoritative source (allowance query for the builder fee; approved-agent
//! list with expiry for the agent wallet), so approvals granted out-of-band
//! are recognized on the next check. The cache only keeps the last derived
//! state as a same-session UI hint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::api::{ApiError, AuthenticatedClient, Method};
use crate::cache::TtlCache;
use crate::config::ExchangeConfig;

/// Gating state for the funding/trading UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    /// Wallet not connected; terminal regardless of other flags
    NotConnected,
    /// Wallet connected but no access token
    Connected,
    /// Logged in, but at least one of the two approval gates is missing
    Authenticated,
    /// All gates passed; orders may be submitted
    ReadyToTrade,
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalState::NotConnected => write!(f, "not_connected"),
            ApprovalState::Connected => write!(f, "connected"),
            ApprovalState::Authenticated => write!(f, "authenticated"),
            ApprovalState::ReadyToTrade => write!(f, "ready_to_trade"),
        }
    }
}

/// Derive the gating state from the four authoritative flags
///
/// Pure and idempotent; both approval gates must pass for
/// [`ApprovalState::ReadyToTrade`].
pub fn derive_state(
    wallet_connected: bool,
    has_access_token: bool,
    builder_fee_approved: bool,
    agent_approved: bool,
) -> ApprovalState {
    if !wallet_connected {
        return ApprovalState::NotConnected;
    }
    if !has_access_token {
        return ApprovalState::Connected;
    }
    if !builder_fee_approved || !agent_approved {
        return ApprovalState::Authenticated;
    }
    ApprovalState::ReadyToTrade
}

/// An agent key the user has approved to trade on their behalf
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentApproval {
    pub address: String,
    /// Expiry; an absent value means no expiry
    pub valid_until: Option<DateTime<Utc>>,
}

impl AgentApproval {
    /// Whether this approval is usable right now
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.map(|until| until > now).unwrap_or(true)
    }
}

/// Errors from approval-state computation
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error("Approval query failed: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid approval response: {0}")]
    InvalidResponse(String),
}

/// Authoritative source for the two approval gates
#[async_trait]
pub trait ApprovalSource: Send + Sync {
    /// Current builder-fee allowance for `user`, in tenths of a basis point
    async fn builder_fee_allowance(&self, user: &str) -> Result<u64, ApprovalError>;

    /// Agents `user` has approved, including expired ones
    async fn approved_agents(&self, user: &str) -> Result<Vec<AgentApproval>, ApprovalError>;
}

/// Inputs for one state computation
#[derive(Debug, Clone)]
pub struct ApprovalContext {
    pub wallet_connected: bool,
    pub has_access_token: bool,
    /// User's wallet address; required once connected
    pub user_address: Option<String>,
    /// Agent key expected in the approved list
    pub agent_address: Option<String>,
}

/// Computes the gating state from live approval queries
pub struct ApprovalChecker<S> {
    source: S,
    builder_address: String,
    max_builder_fee: u64,
    /// Last derived state, UI hint only
    cache: TtlCache<String, ApprovalState>,
}

impl<S: ApprovalSource> ApprovalChecker<S> {
    pub fn new(source: S, config: &ExchangeConfig) -> Self {
        Self {
            source,
            builder_address: config.builder_address.clone(),
            max_builder_fee: config.max_builder_fee,
            cache: TtlCache::new(),
        }
    }

    /// Re-derive the gating state from the authoritative sources
    pub async fn compute_state(&self, ctx: &ApprovalContext) -> Result<ApprovalState, ApprovalError> {
        // Short-circuit the cheap gates; no queries without a session
        if !ctx.wallet_connected || !ctx.has_access_token {
            let state = derive_state(ctx.wallet_connected, ctx.has_access_token, false, false);
            self.remember(ctx, state);
            return Ok(state);
        }

        let user = ctx.user_address.as_deref().ok_or_else(|| {
            ApprovalError::InvalidResponse("connected wallet has no address".to_string())
        })?;

        let builder_ok = self.builder_fee_approved(user).await?;
        let agent_ok = self.agent_approved(user, ctx.agent_address.as_deref()).await?;

        let state = derive_state(true, true, builder_ok, agent_ok);
        log::debug!(
            "Approval state for {}: {} (builder: {}, agent: {})",
            user,
            state,
            builder_ok,
            agent_ok
        );
        self.remember(ctx, state);

        Ok(state)
    }

    /// Last derived state for this user, if computed within `ttl`
    ///
    /// Display hint only; never a substitute for [`Self::compute_state`].
    pub fn cached_state(&self, ctx: &ApprovalContext, ttl: Duration) -> Option<ApprovalState> {
        self.cache.get_valid(&Self::cache_key(ctx), ttl)
    }

    async fn builder_fee_approved(&self, user: &str) -> Result<bool, ApprovalError> {
        let allowance = self.source.builder_fee_allowance(user).await?;
        Ok(allowance >= self.max_builder_fee)
    }

    async fn agent_approved(
        &self,
        user: &str,
        agent_address: Option<&str>,
    ) -> Result<bool, ApprovalError> {
        let agent = match agent_address {
            Some(a) => a.to_lowercase(),
            None => return Ok(false),
        };

        let agents = self.source.approved_agents(user).await?;
        let now = Utc::now();

        Ok(agents
            .iter()
            .any(|a| a.address.to_lowercase() == agent && a.is_active(now)))
    }

    fn remember(&self, ctx: &ApprovalContext, state: ApprovalState) {
        self.cache.set(Self::cache_key(ctx), state);
    }

    fn cache_key(ctx: &ApprovalContext) -> String {
        ctx.user_address.clone().unwrap_or_default()
    }

    /// Builder address whose approval is checked
    pub fn builder_address(&self) -> &str {
        &self.builder_address
    }
}

/// [`ApprovalSource`] backed by the exchange API
#[derive(Debug, Clone)]
pub struct ExchangeApprovalSource {
    client: AuthenticatedClient,
    builder_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllowanceResponse {
    max_fee_rate: u64,
}

impl ExchangeApprovalSource {
    pub fn new(client: AuthenticatedClient, config: &ExchangeConfig) -> Self {
        Self {
            client,
            builder_address: config.builder_address.clone(),
        }
    }
}

#[async_trait]
impl ApprovalSource for ExchangeApprovalSource {
    async fn builder_fee_allowance(&self, user: &str) -> Result<u64, ApprovalError> {
        let path = format!(
            "info/builder-fee?user={}&builder={}",
            user, self.builder_address
        );
        let response: AllowanceResponse = self
            .client
            .request_as(Method::Get, &path, None, true)
            .await?;

        Ok(response.max_fee_rate)
    }

    async fn approved_agents(&self, user: &str) -> Result<Vec<AgentApproval>, ApprovalError> {
        let path = format!("info/agents?user={}", user);
        let agents: Vec<AgentApproval> = self
            .client
            .request_as(Method::Get, &path, None, true)
            .await?;

        Ok(agents)
    }
}
