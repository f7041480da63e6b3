use anyhow::{bail, Result};
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cache::pending_state::PendingStates;
use crate::cache::token_store::TokenStore;
use crate::config::provider::ProviderConfig;
use crate::config::settings::{HttpConfig, MetricsConfig, SettingsConfig};
use crate::config::ServiceConfig;
use crate::credentials::client::CredentialClient;
use crate::helpers::time::get_token_safety_margin_seconds;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::resilience::refresh::TokenManager;
use crate::resources::client::ResourceClient;
use crate::routes::{account, auth, catalog, status};

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub tokens: TokenManager<CredentialClient>,
    pub resources: ResourceClient,
    pub pending_states: PendingStates,
    pub provider: Arc<ProviderConfig>,
    pub session_cookie: String,
    cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    pub async fn new(service_config: &ServiceConfig, client: Client) -> Result<Self> {
        let metrics = get_metrics().await;
        let provider = &service_config.provider;
        let base_url = provider.base_url();

        if service_config.session.secret.len() < 32 {
            bail!("session secret must be at least 32 bytes");
        }

        let credentials = CredentialClient::new(&base_url, &provider.client_id, &provider.client_secret, client.clone());
        let tokens = TokenManager::new(
            TokenStore::new(),
            credentials,
            &provider.client_scope,
            get_token_safety_margin_seconds(service_config.settings.safety_margin_seconds),
        );

        Ok(Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            tokens,
            resources: ResourceClient::new(&base_url, client),
            pending_states: PendingStates::new(),
            provider: Arc::new(provider.clone()),
            session_cookie: service_config.session.cookie_name.clone(),
            cookie_key: Key::derive_from(service_config.session.secret.as_bytes()),
        })
    }
}

/// Outbound client shared by the credential and resource clients.
pub fn build_http_client(http_config: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_millis(http_config.timeout_ms))
        .build()?)
}

pub fn router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    Router::new()
        .route("/", get(status::index))
        .route("/api/status", get(status::api_status))
        .route("/api/initialize", post(catalog::initialize))
        .route("/api/locations/search", get(catalog::search_locations))
        .route("/api/locations/{location_id}", get(catalog::get_location))
        .route("/api/products/search", get(catalog::search_products))
        .route("/api/products/{product_id}", get(catalog::get_product))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/api/logout", get(auth::logout))
        .route("/api/profile", get(account::profile))
        .route("/api/cart/add", post(account::add_to_cart))
        .merge(state.metrics_state.router(metrics_config))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start(settings_config: &SettingsConfig, state: AppState) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(state, &settings_config.metrics);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("listening on {}", listener.local_addr()?);
    metrics.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    metrics.up.set(0);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
