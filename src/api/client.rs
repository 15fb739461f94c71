//! Authenticated JSON client
//!
//! Wraps a transport with the behavior every exchange call needs: bearer
//! injection, a single refresh-and-retry on 401, and bounded
//! exponential-backoff retries for transient failures. Non-401 4xx responses
//! are well-formed server rejections and propagate immediately.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::session::{AuthSession, SessionStore};
use crate::api::transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

/// Retry schedule for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// HTTP client for one API base URL
///
/// Cheap to clone; clones share the transport and session store.
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    session: SessionStore,
    retry: RetryPolicy,
    refresh_path: String,
}

impl AuthenticatedClient {
    /// Create a client over the production reqwest transport
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_transport(base_url, session, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a custom transport (tests inject mocks here)
    pub fn with_transport(
        base_url: impl Into<String>,
        session: SessionStore,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            session,
            retry: RetryPolicy::default(),
            refresh_path: "auth/refresh".to_string(),
        }
    }

    /// Override the retry schedule
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the token-refresh endpoint path
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// The shared session store
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// GET a JSON endpoint
    pub async fn get(&self, path: &str, require_auth: bool) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None, require_auth).await
    }

    /// POST a JSON body
    pub async fn post(
        &self,
        path: &str,
        body: Value,
        require_auth: bool,
    ) -> Result<Value, ApiError> {
        self.request(Method::Post, path, Some(body), require_auth)
            .await
    }

    /// Perform a request and deserialize the response body
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        require_auth: bool,
    ) -> Result<T, ApiError> {
        let value = self.request(method, path, body, require_auth).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected response shape: {}", e)))
    }

    /// Perform a request with the full resilience behavior
    ///
    /// # Arguments
    ///
    /// * `method` - GET or POST
    /// * `path` - Path relative to the client's base URL (may carry a query)
    /// * `body` - JSON body for POST requests
    /// * `require_auth` - Inject the bearer token and handle 401s
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        require_auth: bool,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        let mut refreshed = false;
        let mut attempt: u32 = 0;

        loop {
            let bearer = if require_auth {
                // Fail before touching the network when not logged in
                Some(self.session.access_token().ok_or(ApiError::AuthRequired)?)
            } else {
                None
            };

            let request = HttpRequest {
                method,
                url: url.clone(),
                bearer: bearer.clone(),
                body: body.clone(),
            };

            let transient = match self.transport.execute(request).await {
                Ok(response) if (200..300).contains(&response.status) => {
                    return response.json();
                }
                Ok(response) if response.status == 401 && require_auth => {
                    if refreshed {
                        // Refresh succeeded but the server still rejects the
                        // token; give up rather than loop
                        log::warn!("401 after token refresh for {}; clearing session", url);
                        self.session.clear();
                        return Err(ApiError::SessionExpired);
                    }
                    self.refresh_session(bearer.as_deref().unwrap_or_default())
                        .await?;
                    refreshed = true;
                    continue;
                }
                Ok(response) if response.status == 429 => {
                    log::warn!("Rate limited on {}", url);
                    return Err(ApiError::RateLimited);
                }
                Ok(response) if (400..500).contains(&response.status) => {
                    return Err(ApiError::Validation {
                        status: response.status,
                        message: error_message(&response),
                    });
                }
                Ok(response) => {
                    ApiError::Transient(format!("server error {}", response.status))
                }
                Err(e) if e.is_transient() => e,
                Err(e) => return Err(e),
            };

            attempt += 1;
            if attempt >= self.retry.max_attempts {
                return Err(transient);
            }

            let delay = self.retry.base_delay * 2u32.saturating_pow(attempt - 1);
            log::debug!(
                "Transient failure on {} (attempt {}/{}), retrying in {:?}: {}",
                url,
                attempt,
                self.retry.max_attempts,
                delay,
                transient
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Refresh the session, serializing concurrent attempts
    ///
    /// `stale_token` is the access token the caller saw rejected. If the
    /// stored token differs once the refresh guard is acquired, a concurrent
    /// request already refreshed and no further call is made.
    async fn refresh_session(&self, stale_token: &str) -> Result<(), ApiError> {
        let _guard = self.session.lock_refresh().await;

        match self.session.access_token() {
            Some(current) if current != stale_token => {
                log::debug!("Token already refreshed by a concurrent request");
                return Ok(());
            }
            _ => {}
        }

        let refresh_token = match self.session.refresh_token() {
            Some(t) => t,
            None => {
                self.session.clear();
                return Err(ApiError::SessionExpired);
            }
        };

        log::debug!("Refreshing access token");
        let request = HttpRequest::post(
            self.url_for(&self.refresh_path),
            serde_json::json!({ "refreshToken": refresh_token }),
        );

        // A failed refresh ends the session; no retries here
        let tokens = match self.transport.execute(request).await {
            Ok(response) if (200..300).contains(&response.status) => {
                parse_tokens(&response)
            }
            Ok(response) => Err(ApiError::InvalidResponse(format!(
                "refresh rejected with status {}",
                response.status
            ))),
            Err(e) => Err(e),
        };

        match tokens {
            Ok(session) => {
                self.session.set(session);
                Ok(())
            }
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Pull `{accessToken, refreshToken}` out of a refresh/login response
fn parse_tokens(response: &HttpResponse) -> Result<AuthSession, ApiError> {
    let value = response.json()?;
    let access = value
        .get("accessToken")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidResponse("missing accessToken".to_string()))?;
    let refresh = value
        .get("refreshToken")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidResponse("missing refreshToken".to_string()))?;

    Ok(AuthSession {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    })
}

/// Best-effort human-readable message from an error response body
fn error_message(response: &HttpResponse) -> String {
    response
        .json()
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| response.body.chars().take(200).collect())
}
