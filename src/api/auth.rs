//! Exchange auth endpoints
//!
//! Login is EIP-712 based: the exchange hands out a typed message, the user's
//! wallet signs it, and the signature is exchanged for an access/refresh token
//! pair. Tokens land in the shared [`SessionStore`]; refresh is handled
//! inside [`AuthenticatedClient`](crate::api::AuthenticatedClient).

use serde::Deserialize;
use serde_json::json;

use crate::api::client::AuthenticatedClient;
use crate::api::error::ApiError;
use crate::api::session::AuthSession;

/// Token pair returned by login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// EIP-712 message to be signed by the user's wallet
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Message {
    /// Opaque typed-data payload, passed to the wallet as-is
    pub message: serde_json::Value,
    /// Server nonce echoed back on login
    pub nonce: String,
}

/// Typed wrappers for the auth API
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: AuthenticatedClient,
}

impl AuthApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Fetch the EIP-712 login message for an address
    pub async fn eip712_message(&self, address: &str) -> Result<Eip712Message, ApiError> {
        self.client
            .request_as(
                crate::api::Method::Post,
                "auth/eip712-message",
                Some(json!({ "address": address })),
                false,
            )
            .await
    }

    /// Exchange a signed message for tokens and store them in the session
    pub async fn login(
        &self,
        address: &str,
        signature: &str,
        nonce: &str,
    ) -> Result<AuthTokens, ApiError> {
        let tokens: AuthTokens = self
            .client
            .request_as(
                crate::api::Method::Post,
                "auth/login",
                Some(json!({
                    "address": address,
                    "signature": signature,
                    "nonce": nonce,
                })),
                false,
            )
            .await?;

        self.client.session().set(AuthSession {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        });
        log::info!("Logged in as {}", address);

        Ok(tokens)
    }

    /// Invalidate the session server-side and locally
    ///
    /// The local session is cleared even when the endpoint call fails; a
    /// dropped logout request must not leave the client authenticated.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .client
            .post("auth/logout", json!({}), true)
            .await
            .map(|_| ());

        self.client.session().clear();

        match result {
            Ok(()) => Ok(()),
            Err(ApiError::AuthRequired) => Ok(()), // nothing to log out of
            Err(e) => {
                log::warn!("Logout endpoint failed (session cleared locally): {}", e);
                Ok(())
            }
        }
    }
}
