//! Authenticated HTTP layer
//!
//! A resilient JSON client over a pluggable transport: bearer-token
//! injection, one-shot refresh-and-retry on 401, and bounded
//! exponential-backoff retry for transient failures. All session state lives
//! in one shared store so concurrent callers agree on the current token.

pub mod auth;
pub mod client;
pub mod error;
pub mod session;
pub mod transport;

pub use auth::{AuthApi, AuthTokens, Eip712Message};
pub use client::{AuthenticatedClient, RetryPolicy};
pub use error::ApiError;
pub use session::{AuthSession, SessionStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
