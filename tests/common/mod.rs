//! Common test utilities for API-layer integration tests
//!
//! Provides a scripted [`HttpTransport`] implementation so client behavior
//! (auth injection, refresh, retry) can be tested without a network.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use btc_funding_wallet::api::{
    ApiError, AuthSession, HttpRequest, HttpResponse, HttpTransport, SessionStore,
};

/// Transport that replays a scripted queue of responses
///
/// Every executed request is recorded for later assertions. Popping an empty
/// queue panics, so a test that scripts too few responses fails loudly.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script a JSON response with the given status
    pub fn push_json(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
    }

    /// Script a response with a raw body
    pub fn push_body(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
    }

    /// Script a transport-level failure
    pub fn push_error(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// All requests executed so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockTransport queue exhausted: test scripted too few responses")
    }
}

/// A session store pre-loaded with a token pair
pub fn logged_in_session(access: &str, refresh: &str) -> SessionStore {
    let store = SessionStore::new();
    store.set(AuthSession {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    });
    store
}
