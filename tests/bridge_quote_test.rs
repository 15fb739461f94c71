//! Quote normalization tests
//!
//! Drives the quote client against a scripted transport and checks that the
//! single-hop and multi-hop paths reduce to the same canonical quote.
//!
//! Run tests:
//! ```bash
//! cargo test --test bridge_quote_test
//! ```

mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use btc_funding_wallet::api::{ApiError, AuthenticatedClient, SessionStore};
use btc_funding_wallet::bridge::{QuoteClient, QuoteError, QuoteRequest};
use btc_funding_wallet::config::{BridgeConfig, BITCOIN_CHAIN_ID};
use common::MockTransport;

const ADVANCED_CHAIN: u64 = 999;

fn bridge_config() -> BridgeConfig {
    BridgeConfig {
        api_url: "https://bridge.test/v1".to_string(),
        advanced_route_chain_id: ADVANCED_CHAIN,
        default_slippage: 0.01,
    }
}

fn quote_client(transport: Arc<MockTransport>) -> QuoteClient {
    let client =
        AuthenticatedClient::with_transport("https://bridge.test/v1", SessionStore::new(), transport);
    QuoteClient::new(client, bridge_config())
}

fn request(to_chain_id: u64) -> QuoteRequest {
    QuoteRequest {
        from_btc_address: "bc1quser".to_string(),
        from_amount_sats: 250_000,
        to_chain_id,
        to_token: "USDC".to_string(),
        to_address: "0xdest".to_string(),
        slippage: None,
        allow_bridges: None,
    }
}

/// Step-shaped JSON as the bridge returns it
fn step_json(
    tool: &str,
    to_amount: &str,
    to_amount_min: &str,
    duration: f64,
    with_tx: bool,
) -> Value {
    let mut step = json!({
        "id": "step-1",
        "tool": tool,
        "action": {
            "fromChainId": BITCOIN_CHAIN_ID,
            "toChainId": 42161,
            "fromToken": {"symbol": "BTC"},
            "toToken": {"symbol": "USDC"},
            "fromAmount": "250000",
            "slippage": 0.01,
        },
        "estimate": {
            "fromAmount": "250000",
            "toAmount": to_amount,
            "toAmountMin": to_amount_min,
            "toAmountUSD": "250.00",
            "executionDuration": duration,
        },
    });
    if with_tx {
        step["transactionRequest"] = json!({
            "to": "bc1qvault",
            "value": "250000",
            "data": "0200000001deadbeef",
        });
    }
    step
}

#[tokio::test]
async fn test_direct_quote_hits_quote_endpoint() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, step_json("relay", "248000", "246000", 900.0, true));

    let client = quote_client(transport.clone());
    let quote = client.get_quote(&request(42161)).await.unwrap();

    assert_eq!(quote.tool, "relay");
    assert_eq!(quote.to_amount, "248000");
    assert_eq!(quote.to_amount_min, "246000");
    assert_eq!(quote.transaction_request.to, "bc1qvault");
    assert_eq!(quote.value_sats(), Some(250_000));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.contains("/quote?"));
    assert!(
        requests[0].url.contains(&format!("fromChain={}", BITCOIN_CHAIN_ID)),
        "source chain must be the Bitcoin pseudo-chain: {}",
        requests[0].url
    );
    assert!(requests[0].url.contains("slippage=0.01"), "default slippage applies");
}

#[tokio::test]
async fn test_direct_quote_never_touches_advanced_endpoints() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, step_json("relay", "100", "99", 60.0, true));

    let client = quote_client(transport.clone());
    client.get_quote(&request(1)).await.unwrap();

    for req in transport.requests() {
        assert!(
            !req.url.contains("advanced"),
            "direct destinations must not use the routes planner: {}",
            req.url
        );
    }
}

#[tokio::test]
async fn test_advanced_route_normalizes_totals_and_duration() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(
        200,
        json!({
            "routes": [{
                "id": "route-1",
                "fromAmount": "250000",
                "toAmount": "247000",
                "toAmountMin": "245000",
                "toAmountUSD": "247.00",
                "toChainId": ADVANCED_CHAIN,
                "steps": [
                    step_json("relay", "249000", "248000", 600.0, true),
                    step_json("hopBridge", "247000", "245000", 300.0, false),
                ],
            }]
        }),
    );

    let client = quote_client(transport.clone());
    let quote = client.get_quote(&request(ADVANCED_CHAIN)).await.unwrap();

    // Totals come from the route, not the first step
    assert_eq!(quote.to_amount, "247000");
    assert_eq!(quote.to_amount_min, "245000");
    assert_eq!(quote.execution_duration, 900.0);
    assert_eq!(quote.tool, "relay");
    assert_eq!(
        quote.included_steps.as_ref().map(Vec::len),
        Some(1),
        "remaining legs are kept for display"
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/advanced/routes"));
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["fromChainId"], BITCOIN_CHAIN_ID);
    assert_eq!(body["fromAmount"], "250000");
}

#[tokio::test]
async fn test_advanced_route_fetches_missing_step_transaction() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(
        200,
        json!({
            "routes": [{
                "fromAmount": "250000",
                "toAmount": "247000",
                "toAmountMin": "245000",
                "steps": [step_json("relay", "247000", "245000", 600.0, false)],
            }]
        }),
    );
    // stepTransaction echoes the step with the transaction attached
    transport.push_json(200, step_json("relay", "247000", "245000", 600.0, true));

    let client = quote_client(transport.clone());
    let quote = client.get_quote(&request(ADVANCED_CHAIN)).await.unwrap();

    assert_eq!(quote.transaction_request.to, "bc1qvault");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].url.ends_with("/advanced/stepTransaction"));
}

#[tokio::test]
async fn test_advanced_route_without_transaction_is_unavailable() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(
        200,
        json!({
            "routes": [{
                "fromAmount": "250000",
                "toAmount": "247000",
                "toAmountMin": "245000",
                "steps": [step_json("relay", "247000", "245000", 600.0, false)],
            }]
        }),
    );
    // Even the stepTransaction endpoint comes back without one
    transport.push_json(200, step_json("relay", "247000", "245000", 600.0, false));

    let client = quote_client(transport);
    let err = client.get_quote(&request(ADVANCED_CHAIN)).await.unwrap_err();
    assert!(matches!(err, QuoteError::TransactionUnavailable));
}

#[tokio::test]
async fn test_empty_routes_means_no_route_available() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, json!({"routes": []}));

    let client = quote_client(transport);
    let err = client.get_quote(&request(ADVANCED_CHAIN)).await.unwrap_err();
    assert!(matches!(err, QuoteError::NoRouteAvailable));
}

#[tokio::test]
async fn test_missing_routes_field_means_no_route_available() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, json!({}));

    let client = quote_client(transport);
    let err = client.get_quote(&request(ADVANCED_CHAIN)).await.unwrap_err();
    assert!(matches!(err, QuoteError::NoRouteAvailable));
}

#[tokio::test]
async fn test_quote_violating_min_bound_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, step_json("relay", "100", "101", 60.0, true));

    let client = quote_client(transport);
    let err = client.get_quote(&request(1)).await.unwrap_err();
    assert!(matches!(err, QuoteError::InvalidQuote(_)));
}

#[tokio::test]
async fn test_explicit_slippage_overrides_default() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, step_json("relay", "100", "99", 60.0, true));

    let client = quote_client(transport.clone());
    let mut req = request(1);
    req.slippage = Some(0.005);
    client.get_quote(&req).await.unwrap();

    assert!(transport.requests()[0].url.contains("slippage=0.005"));
}

#[tokio::test]
async fn test_api_errors_propagate() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(429, json!({"message": "slow down"}));

    let client = quote_client(transport);
    let err = client.get_quote(&request(1)).await.unwrap_err();
    assert!(matches!(err, QuoteError::Api(ApiError::RateLimited)));
}
