use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{GatewayError, GatewayResult};
use crate::resources::cart::validate_cart_items;
use crate::resources::models::{CartItem, Profile};
use crate::server::server::AppState;
use crate::server::session::current_session;

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

fn require_session(state: &AppState, jar: &SignedCookieJar) -> GatewayResult<String> {
    current_session(jar, &state.session_cookie).ok_or_else(|| GatewayError::auth("Not logged in"))
}

pub async fn profile(State(state): State<AppState>, jar: SignedCookieJar) -> GatewayResult<Json<Profile>> {
    let session_key = require_session(&state, &jar)?;
    let resources = &state.resources;
    let profile = state
        .tokens
        .with_user_token(&session_key, move |token| async move { resources.get_profile(&token).await })
        .await?;
    Ok(Json(profile))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    body: Result<Json<CartRequest>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let Json(request) = body?;
    validate_cart_items(&request.items)?;
    let session_key = require_session(&state, &jar)?;

    let resources = &state.resources;
    let items = request.items.as_slice();
    state
        .tokens
        .with_user_token(&session_key, move |token| async move { resources.add_to_cart(&token, items).await })
        .await?;

    info!("added {} item(s) to cart", items.len());
    Ok(Json(json!({
        "success": true,
        "message": "Items added to cart successfully",
    })))
}
