//! Quote normalization engine
//!
//! One destination chain cannot be reached in a single hop and must go
//! through the bridge's advanced-routes planner; everywhere else the direct
//! quote endpoint answers in one round-trip. Both paths reduce to the same
//! canonical [`Quote`] so callers never see how many hops were required.

use serde_json::json;

use crate::api::{ApiError, AuthenticatedClient, Method};
use crate::bridge::types::{Quote, QuoteRequest, Route, RoutesResponse, Step};
use crate::config::{BridgeConfig, BITCOIN_CHAIN_ID, BITCOIN_TOKEN};

/// Errors surfaced by quote normalization
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The planner found no path for this amount/destination; the user should
    /// adjust amount or slippage
    #[error("No route available for this amount and destination")]
    NoRouteAvailable,

    /// A route exists but the bridge could not produce the transaction to
    /// sign for its first step
    #[error("Bridge did not return a signable transaction for the route")]
    TransactionUnavailable,

    /// The response violated a quote invariant
    #[error("Invalid quote from bridge: {0}")]
    InvalidQuote(String),

    #[error("Bridge API error: {0}")]
    Api(#[from] ApiError),
}

/// Client for the bridge quote API
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: AuthenticatedClient,
    config: BridgeConfig,
}

impl QuoteClient {
    pub fn new(client: AuthenticatedClient, config: BridgeConfig) -> Self {
        Self { client, config }
    }

    /// Obtain one canonical quote for a funding request
    ///
    /// Dispatches to the advanced-routes planner when the destination
    /// requires it and to the direct quote endpoint otherwise.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let slippage = request.slippage.unwrap_or(self.config.default_slippage);

        let quote = if request.to_chain_id == self.config.advanced_route_chain_id {
            log::debug!(
                "Destination chain {} requires advanced routing",
                request.to_chain_id
            );
            self.advanced_route_quote(request, slippage).await?
        } else {
            self.direct_quote(request, slippage).await?
        };

        validate_quote(&quote)?;
        log::info!(
            "Quote via {}: {} sats -> {} (min {})",
            quote.tool,
            quote.from_amount,
            quote.to_amount,
            quote.to_amount_min
        );

        Ok(quote)
    }

    /// Single-hop path: `GET /quote`
    async fn direct_quote(
        &self,
        request: &QuoteRequest,
        slippage: f64,
    ) -> Result<Quote, QuoteError> {
        let mut path = format!(
            "quote?fromChain={}&fromToken={}&fromAddress={}&fromAmount={}&toChain={}&toToken={}&toAddress={}&slippage={}",
            BITCOIN_CHAIN_ID,
            BITCOIN_TOKEN,
            request.from_btc_address,
            request.from_amount_sats,
            request.to_chain_id,
            request.to_token,
            request.to_address,
            slippage,
        );
        if let Some(bridges) = &request.allow_bridges {
            path.push_str(&format!("&allowBridges={}", bridges.join(",")));
        }

        let step: Step = self
            .client
            .request_as(Method::Get, &path, None, false)
            .await?;

        normalize_step(step)
    }

    /// Multi-hop path: `POST /advanced/routes`, then possibly
    /// `POST /advanced/stepTransaction` for the first step
    async fn advanced_route_quote(
        &self,
        request: &QuoteRequest,
        slippage: f64,
    ) -> Result<Quote, QuoteError> {
        let body = json!({
            "fromChainId": BITCOIN_CHAIN_ID,
            "fromTokenAddress": BITCOIN_TOKEN,
            "fromAddress": request.from_btc_address,
            "fromAmount": request.from_amount_sats.to_string(),
            "toChainId": request.to_chain_id,
            "toTokenAddress": request.to_token,
            "toAddress": request.to_address,
            "options": {
                "slippage": slippage,
                "bridges": request.allow_bridges.as_ref().map(|b| json!({ "allow": b })),
            },
        });

        let response: RoutesResponse = self
            .client
            .request_as(Method::Post, "advanced/routes", Some(body), false)
            .await?;

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or(QuoteError::NoRouteAvailable)?;

        self.normalize_route(route).await
    }

    /// Reduce a multi-step route to the canonical quote
    ///
    /// Only the first step needs a user signature; the remaining legs execute
    /// autonomously once funds land at the bridge vault. Output totals
    /// therefore come from the route, not the first step, and the duration is
    /// summed across all steps.
    async fn normalize_route(&self, route: Route) -> Result<Quote, QuoteError> {
        let execution_duration: f64 = route
            .steps
            .iter()
            .map(|s| s.estimate.execution_duration)
            .sum();

        let mut steps = route.steps.into_iter();
        let first = steps.next().ok_or(QuoteError::NoRouteAvailable)?;

        let first = match first.transaction_request {
            Some(_) => first,
            None => {
                log::debug!("First step missing transactionRequest, fetching it");
                self.fetch_step_transaction(first).await?
            }
        };

        let transaction_request = first
            .transaction_request
            .ok_or(QuoteError::TransactionUnavailable)?;

        let remaining: Vec<serde_json::Value> = steps
            .map(|s| serde_json::to_value(s).unwrap_or_default())
            .collect();

        Ok(Quote {
            tool: first.tool,
            from_amount: route.from_amount,
            to_amount: route.to_amount,
            to_amount_min: route.to_amount_min,
            to_amount_usd: route.to_amount_usd,
            execution_duration,
            transaction_request,
            included_steps: if remaining.is_empty() {
                None
            } else {
                Some(remaining)
            },
        })
    }

    /// One extra round-trip to materialize a step's transaction request
    async fn fetch_step_transaction(&self, step: Step) -> Result<Step, QuoteError> {
        let body = serde_json::to_value(&step)
            .map_err(|e| ApiError::InvalidResponse(format!("unserializable step: {}", e)))?;

        let step: Step = self
            .client
            .request_as(Method::Post, "advanced/stepTransaction", Some(body), false)
            .await?;

        Ok(step)
    }
}

/// Canonicalize a single-hop quote response (itself step-shaped)
fn normalize_step(step: Step) -> Result<Quote, QuoteError> {
    let transaction_request = step
        .transaction_request
        .ok_or(QuoteError::TransactionUnavailable)?;

    Ok(Quote {
        tool: step.tool,
        from_amount: step.estimate.from_amount,
        to_amount: step.estimate.to_amount,
        to_amount_min: step.estimate.to_amount_min,
        to_amount_usd: step.estimate.to_amount_usd,
        execution_duration: step.estimate.execution_duration,
        transaction_request,
        included_steps: step.included_steps,
    })
}

/// Boundary validation for the canonical quote
fn validate_quote(quote: &Quote) -> Result<(), QuoteError> {
    let to_amount: u128 = quote
        .to_amount
        .parse()
        .map_err(|_| QuoteError::InvalidQuote(format!("bad toAmount '{}'", quote.to_amount)))?;
    let to_amount_min: u128 = quote.to_amount_min.parse().map_err(|_| {
        QuoteError::InvalidQuote(format!("bad toAmountMin '{}'", quote.to_amount_min))
    })?;

    if to_amount_min > to_amount {
        return Err(QuoteError::InvalidQuote(format!(
            "toAmountMin {} exceeds toAmount {}",
            to_amount_min, to_amount
        )));
    }

    Ok(())
}
