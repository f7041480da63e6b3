//! Token lifecycle: lazy renewal and the single refresh-and-retry policy.
//!
//! Resource calls are wrapped here instead of in each route so the rule
//! "at most one refresh per request" lives in one place.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::token::TokenRecord;
use crate::cache::token_store::TokenStore;
use crate::credentials::TokenIssuer;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::now_i64;
use crate::observability::metrics::get_metrics;

pub struct TokenManager<I> {
    store: TokenStore,
    issuer: Arc<I>,
    client_scope: String,
    safety_margin_seconds: u64,
}

impl<I> Clone for TokenManager<I> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            issuer: self.issuer.clone(),
            client_scope: self.client_scope.clone(),
            safety_margin_seconds: self.safety_margin_seconds,
        }
    }
}

impl<I: TokenIssuer> TokenManager<I> {
    pub fn new(store: TokenStore, issuer: I, client_scope: &str, safety_margin_seconds: u64) -> Self {
        Self {
            store,
            issuer: Arc::new(issuer),
            client_scope: client_scope.to_owned(),
            safety_margin_seconds,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    fn is_usable(&self, token: &TokenRecord) -> bool {
        !token.is_expired(now_i64(), self.safety_margin_seconds)
    }

    // -------------------------------
    // Client-credentials token
    // -------------------------------

    /// Cached app token, renewed when absent or expired.
    pub async fn client_token(&self) -> GatewayResult<TokenRecord> {
        if let Some(token) = self.store.client_token().await.filter(|t| self.is_usable(t)) {
            return Ok(token);
        }
        self.renew_client_token().await
    }

    async fn renew_client_token(&self) -> GatewayResult<TokenRecord> {
        let token = self.issuer.client_credentials(&self.client_scope).await?;
        self.store.put_client_token(token.clone()).await;
        info!("client credentials token stored");
        Ok(token)
    }

    /// Run `operation` with the app token; a 401 renews it and retries once.
    pub async fn with_client_token<F, Fut, T>(&self, mut operation: F) -> GatewayResult<T>
    where
        F: FnMut(TokenRecord) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let token = self.client_token().await?;
        match operation(token).await {
            Err(e) if e.is_unauthorized() => {
                warn!("client token rejected by provider, renewing once");
                let token = self.renew_client_token().await?;
                operation(token).await
            }
            result => result,
        }
    }

    // -------------------------------
    // User tokens
    // -------------------------------

    /// Exchange the authorization code and bind the user token to the session.
    pub async fn complete_login(&self, session_key: &str, code: &str, redirect_uri: &str) -> GatewayResult<()> {
        let token = self.issuer.exchange_code(code, redirect_uri).await?;
        self.store.put(session_key, token).await;
        self.publish_session_count().await;
        info!("user token stored for session");
        Ok(())
    }

    /// Drop the session's user token. Other sessions and the app token are untouched.
    pub async fn logout(&self, session_key: &str) -> bool {
        let removed = self.store.remove(session_key).await.is_some();
        self.publish_session_count().await;
        removed
    }

    pub async fn has_user_token(&self, session_key: &str) -> bool {
        self.store.get(session_key).await.is_some()
    }

    /// Run `operation` with the session's user token.
    ///
    /// An expired token is refreshed before the call; an unexpired token the
    /// provider rejects with 401 is refreshed after it. Either way at most one
    /// refresh and one retry happen per invocation.
    pub async fn with_user_token<F, Fut, T>(&self, session_key: &str, mut operation: F) -> GatewayResult<T>
    where
        F: FnMut(TokenRecord) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let token = self
            .store
            .get(session_key)
            .await
            .ok_or_else(|| GatewayError::auth("No user token found for session"))?;

        if !self.is_usable(&token) {
            let refreshed = self.refresh_user_token(session_key, &token).await?;
            return operation(refreshed).await;
        }

        match operation(token.clone()).await {
            Err(e) if e.is_unauthorized() => {
                warn!("user token rejected by provider, refreshing once");
                let refreshed = self.refresh_user_token(session_key, &token).await?;
                operation(refreshed).await
            }
            result => result,
        }
    }

    async fn refresh_user_token(&self, session_key: &str, token: &TokenRecord) -> GatewayResult<TokenRecord> {
        let refresh_token = match token.refresh_token.as_deref().filter(|_| token.can_refresh()) {
            Some(refresh_token) => refresh_token,
            None => {
                self.drop_stale(session_key, token).await;
                return Err(GatewayError::auth("Token expired and no refresh token available"));
            }
        };

        let mut refreshed = match self.issuer.refresh(refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(e @ GatewayError::Auth { .. }) => {
                // refresh token revoked or expired: back to anonymous
                self.drop_stale(session_key, token).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = token.refresh_token.clone();
        }
        self.store.put(session_key, refreshed.clone()).await;
        info!("user token refreshed for session");
        Ok(refreshed)
    }

    /// Remove the session's record only while it is still the one this request
    /// read; a token stored meanwhile by another request stays.
    async fn drop_stale(&self, session_key: &str, stale: &TokenRecord) {
        let removed = self
            .store
            .remove_if(session_key, |current| current.access_token == stale.access_token)
            .await;
        if removed.is_some() {
            info!("stale user token dropped for session");
        }
        self.publish_session_count().await;
    }

    async fn publish_session_count(&self) {
        let count = self.store.session_count().await;
        get_metrics().await.active_user_sessions.set(count as i64);
    }
}
