use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::GatewayResult;
use crate::helpers::time::{now_i64, unix_to_rfc3339};
use crate::resources::locations::{require_id, LocationQuery, DEFAULT_LOCATION_LIMIT, DEFAULT_RADIUS_MILES};
use crate::resources::models::{Location, Product};
use crate::resources::products::ProductQuery;
use crate::server::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    #[serde(default)]
    pub location_id: String,
    pub term: Option<String>,
    pub brand: Option<String>,
    pub product_id: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductLocationParams {
    #[serde(default)]
    pub location_id: String,
}

/// Obtain (or reuse) the client-credentials token and describe it.
pub async fn initialize(State(state): State<AppState>) -> GatewayResult<Json<Value>> {
    let token = state.tokens.client_token().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Client token ready",
        "token_info": {
            "token_type": token.token_type,
            "scope": token.scope,
            "expires_in": token.expires_in(now_i64()),
            "expires_at": unix_to_rfc3339(token.expires_at),
        }
    })))
}

pub async fn search_locations(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> GatewayResult<Json<Vec<Location>>> {
    let Query(params) = params?;
    let query = LocationQuery {
        lat: params.lat,
        lon: params.lon,
        radius_miles: params.radius.unwrap_or(DEFAULT_RADIUS_MILES),
        limit: params.limit.unwrap_or(DEFAULT_LOCATION_LIMIT),
    };
    query.validate()?;

    let resources = &state.resources;
    let locations = state
        .tokens
        .with_client_token(move |token| async move { resources.search_locations(&token, &query).await })
        .await?;
    Ok(Json(locations))
}

pub async fn get_location(State(state): State<AppState>, Path(location_id): Path<String>) -> GatewayResult<Json<Location>> {
    require_id("location id", &location_id)?;

    let resources = &state.resources;
    let location_id = location_id.as_str();
    let location = state
        .tokens
        .with_client_token(move |token| async move { resources.get_location(&token, location_id).await })
        .await?;
    Ok(Json(location))
}

pub async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<ProductParams>, QueryRejection>,
) -> GatewayResult<Json<Vec<Product>>> {
    let Query(params) = params?;
    let query = ProductQuery {
        location_id: params.location_id,
        term: params.term,
        brand: params.brand,
        product_id: params.product_id,
        limit: params.limit,
        start: params.start,
    };
    query.validate()?;

    let resources = &state.resources;
    let query = &query;
    let products = state
        .tokens
        .with_client_token(move |token| async move { resources.search_products(&token, query).await })
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    params: Result<Query<ProductLocationParams>, QueryRejection>,
) -> GatewayResult<Json<Product>> {
    let Query(params) = params?;
    require_id("product id", &product_id)?;
    require_id("location_id", &params.location_id)?;

    let resources = &state.resources;
    let (product_id, location_id) = (product_id.as_str(), params.location_id.as_str());
    let product = state
        .tokens
        .with_client_token(move |token| async move { resources.get_product(&token, product_id, location_id).await })
        .await?;
    Ok(Json(product))
}
