use axum::extract::{Query, State};
use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use http::header::LOCATION;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::now_i64;
use crate::server::server::AppState;
use crate::server::session::{clear_session, current_session, ensure_session};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn found(location: &str) -> (StatusCode, [(http::HeaderName, String); 1]) {
    (StatusCode::FOUND, [(LOCATION, location.to_owned())])
}

/// Start the authorization-code flow for the caller's session.
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> GatewayResult<Response> {
    let (jar, session_key) = ensure_session(jar, &state.session_cookie);
    let pending = state.pending_states.issue(&session_key, now_i64()).await;
    let provider = &state.provider;
    let url = state
        .tokens
        .issuer()
        .authorization_url(&provider.redirect_uri, &provider.user_scope, &pending)?;

    info!("redirecting session to provider login");
    let (status, headers) = found(&url);
    Ok((status, jar, headers).into_response())
}

pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> GatewayResult<Response> {
    let Query(params) = params?;

    if let Some(error) = params.error {
        let description = params.error_description.unwrap_or_default();
        warn!("provider returned authorization error: {}", error);
        return Err(GatewayError::validation(format!("OAuth error: {} {}", error, description).trim_end().to_owned()));
    }

    let code = params.code.filter(|c| !c.is_empty());
    let pending = params.state.filter(|s| !s.is_empty());
    let (code, pending) = match (code, pending) {
        (Some(code), Some(pending)) => (code, pending),
        _ => return Err(GatewayError::validation("Missing code or state parameter")),
    };

    let issued_for = state.pending_states.consume(&pending, now_i64()).await;
    let session_key = match (issued_for, current_session(&jar, &state.session_cookie)) {
        (Some(issued_for), Some(session_key)) if issued_for == session_key => session_key,
        _ => {
            warn!("rejected callback with unknown or foreign state");
            return Err(GatewayError::validation("Invalid or expired state parameter"));
        }
    };

    state
        .tokens
        .complete_login(&session_key, &code, &state.provider.redirect_uri)
        .await
        .map_err(GatewayError::into_invalid_grant)?;

    Ok(found("/").into_response())
}

pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    if let Some(session_key) = current_session(&jar, &state.session_cookie) {
        if state.tokens.logout(&session_key).await {
            info!("session logged out");
        }
    }
    let jar = clear_session(jar, &state.session_cookie);
    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully",
        })),
    )
}
