use axum::extract::State;
use axum::response::Html;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use serde_json::{json, Value};

use crate::server::server::AppState;
use crate::server::session::current_session;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Configuration summary. Never exposes secrets or token values.
pub async fn api_status(State(state): State<AppState>, jar: SignedCookieJar) -> Json<Value> {
    let authenticated = match current_session(&jar, &state.session_cookie) {
        Some(session_key) => state.tokens.has_user_token(&session_key).await,
        None => false,
    };
    let store = state.tokens.store();
    Json(json!({
        "status": "ok",
        "base_url": state.provider.base_url(),
        "client_id": state.provider.masked_client_id(),
        "has_client_token": store.client_token().await.is_some(),
        "active_user_sessions": store.session_count().await,
        "authenticated": authenticated,
    }))
}
