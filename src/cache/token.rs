use serde::Serialize;

/// OAuth2 token as held by the [`TokenStore`](crate::cache::token_store::TokenStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64, // UNIX TIMESTAMP
    pub scope: String,
    pub token_type: String,
}

impl TokenRecord {
    /// `expires_in` is the provider's offset in seconds from `issued_at`.
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        issued_at: i64,
        expires_in: i64,
        scope: String,
        token_type: String,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: issued_at.saturating_add(expires_in),
            scope,
            token_type,
        }
    }

    /// True once `now` is within `skew_seconds` of the expiry.
    pub fn is_expired(&self, now: i64, skew_seconds: u64) -> bool {
        now.saturating_add(skew_seconds as i64) >= self.expires_at
    }

    /// Seconds left before the provider-side expiry, clamped at zero.
    pub fn expires_in(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|refresh_token| !refresh_token.is_empty())
    }
}
