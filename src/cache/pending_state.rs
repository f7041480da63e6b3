use base64::Engine;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::utils::constants::{MAX_PENDING_STATES, PENDING_STATE_TTL_SECS};

/// Authorization request waiting for its callback.
#[derive(Debug, Clone)]
struct PendingState {
    session_key: String,
    issued_at: i64,
}

/// `state` values handed out by `/auth/login`; each one is accepted once.
#[derive(Debug, Clone)]
pub struct PendingStates {
    states: Arc<Mutex<HashMap<String, PendingState>>>,
    ttl_seconds: i64,
    max_entries: usize,
}

impl Default for PendingStates {
    fn default() -> Self {
        Self::with_ttl(PENDING_STATE_TTL_SECS)
    }
}

impl PendingStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl_seconds: i64) -> Self {
        Self::with_limits(ttl_seconds, MAX_PENDING_STATES)
    }

    pub fn with_limits(ttl_seconds: i64, max_entries: usize) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            ttl_seconds,
            max_entries: max_entries.max(1),
        }
    }

    fn prune(&self, states: &mut HashMap<String, PendingState>, now: i64) {
        let ttl = self.ttl_seconds;
        states.retain(|_, pending| now - pending.issued_at < ttl);
    }

    /// Record a fresh random state for `session_key` and return it.
    pub async fn issue(&self, session_key: &str, now: i64) -> String {
        let state = generate_random_state();
        let mut states = self.states.lock().await;
        self.prune(&mut states, now);
        while states.len() >= self.max_entries {
            let oldest = states
                .iter()
                .min_by_key(|(_, pending)| pending.issued_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    debug!("pending state limit reached, evicting oldest");
                    states.remove(&key);
                }
                None => break,
            }
        }
        states.insert(
            state.clone(),
            PendingState {
                session_key: session_key.to_owned(),
                issued_at: now,
            },
        );
        state
    }

    /// Remove `state` and return the session it was issued for, if still fresh.
    pub async fn consume(&self, state: &str, now: i64) -> Option<String> {
        let mut states = self.states.lock().await;
        let pending = states.remove(state);
        self.prune(&mut states, now);
        let pending = pending?;
        if now - pending.issued_at >= self.ttl_seconds {
            debug!("authorization state expired");
            return None;
        }
        Some(pending.session_key)
    }
}

fn generate_random_state() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
