//! Shared auth session store
//!
//! Owns the access/refresh token pair. All session mutation goes through this
//! store so concurrent requests observe a single source of truth, and the
//! refresh guard serializes concurrent refresh attempts: when two requests hit
//! a 401 at the same time, one performs the refresh and the other reuses its
//! result.

use std::sync::{Arc, Mutex};

/// Access/refresh token pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
}

/// Thread-safe owner of the current [`AuthSession`]
///
/// Cheap to clone; clones share the same underlying session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    session: Arc<Mutex<Option<AuthSession>>>,
    /// Held for the duration of a token refresh; see
    /// [`AuthenticatedClient`](crate::api::AuthenticatedClient)
    refresh_guard: Arc<tokio::sync::Mutex<()>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, if logged in
    pub fn access_token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.access_token.clone())
    }

    /// Current refresh token, if logged in
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.refresh_token.clone())
    }

    /// Whether an access token is present
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Replace the session after login or refresh
    pub fn set(&self, session: AuthSession) {
        *self.lock() = Some(session);
    }

    /// Drop the session (logout or failed refresh)
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Acquire the refresh guard
    ///
    /// Callers must re-check the stored access token after acquisition: if it
    /// changed while waiting, another caller already refreshed and the new
    /// token should be used instead of refreshing again.
    pub async fn lock_refresh(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.refresh_guard.lock().await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AuthSession>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
