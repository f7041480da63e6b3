use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::token::TokenRecord;
use crate::utils::constants::CLIENT_CREDENTIALS_KEY;

/// Process-lifetime token map: session key (or the reserved client key) -> token.
///
/// Clones share the same map. Each key is replaced atomically; there are no
/// cross-key transactions.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<HashMap<String, TokenRecord>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<TokenRecord> {
        self.inner.read().await.get(key).cloned()
    }

    /// Overwrites any existing record for `key`.
    pub async fn put(&self, key: &str, record: TokenRecord) {
        self.inner.write().await.insert(key.to_owned(), record);
    }

    pub async fn remove(&self, key: &str) -> Option<TokenRecord> {
        self.inner.write().await.remove(key)
    }

    /// Remove the record under `key` only if `predicate` holds for it.
    pub async fn remove_if<F>(&self, key: &str, predicate: F) -> Option<TokenRecord>
    where
        F: FnOnce(&TokenRecord) -> bool,
    {
        let mut inner = self.inner.write().await;
        if !inner.get(key).is_some_and(predicate) {
            return None;
        }
        inner.remove(key)
    }

    pub async fn client_token(&self) -> Option<TokenRecord> {
        self.get(CLIENT_CREDENTIALS_KEY).await
    }

    pub async fn put_client_token(&self, record: TokenRecord) {
        self.put(CLIENT_CREDENTIALS_KEY, record).await
    }

    /// Number of stored user tokens.
    pub async fn session_count(&self) -> usize {
        self.inner
            .read()
            .await
            .keys()
            .filter(|key| key.as_str() != CLIENT_CREDENTIALS_KEY)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> TokenRecord {
        TokenRecord::new(value.into(), Some(format!("{value}-refresh")), 0, 3600, "profile.compact".into(), "bearer".into())
    }

    #[tokio::test]
    async fn put_overwrites_previous_record() {
        let store = TokenStore::new();
        store.put("session-a", token("first")).await;
        store.put("session-a", token("second")).await;

        assert_eq!(store.get("session-a").await.unwrap().access_token, "second");
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn remove_only_touches_one_session() {
        let store = TokenStore::new();
        store.put("session-a", token("a")).await;
        store.put("session-b", token("b")).await;
        store.put_client_token(token("client")).await;

        let removed = store.remove("session-a").await;

        assert_eq!(removed.unwrap().access_token, "a");
        assert!(store.get("session-a").await.is_none());
        assert_eq!(store.get("session-b").await.unwrap().access_token, "b");
        assert_eq!(store.client_token().await.unwrap().access_token, "client");
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn remove_if_leaves_a_replaced_record() {
        let store = TokenStore::new();
        store.put("session-a", token("newer")).await;

        assert!(store.remove_if("session-a", |r| r.access_token == "older").await.is_none());
        assert_eq!(store.get("session-a").await.unwrap().access_token, "newer");

        let removed = store.remove_if("session-a", |r| r.access_token == "newer").await;
        assert_eq!(removed.unwrap().access_token, "newer");
        assert!(store.remove_if("missing", |_| true).await.is_none());
    }

    #[tokio::test]
    async fn clones_share_state_but_new_stores_are_isolated() {
        let store = TokenStore::new();
        let handle = store.clone();
        handle.put("session-a", token("a")).await;

        assert!(store.get("session-a").await.is_some());
        assert!(TokenStore::new().get("session-a").await.is_none());
    }
}
