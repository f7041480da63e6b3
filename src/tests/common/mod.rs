// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use reqwest::redirect::Policy;
use reqwest::Client;
use std::net::SocketAddr;

use crate::config::loader::parse_config;
use crate::server::server::{router, AppState};

/// Unreachable provider; any request sent there fails with a transport error.
pub const NO_PROVIDER: &str = "http://127.0.0.1:9";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Client for talking to the gateway; redirects are inspected, not followed.
pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .redirect(Policy::none())
        .build()
        .expect("reqwest client")
}

pub fn gateway_yaml(provider_base_url: &str) -> String {
    format!(
        r#"
settings:
  server:
    host: 127.0.0.1
    port: "0"
  http:
    timeout_ms: 2000
  metrics:
    is_enabled: true
provider:
  base_url: "{}"
  client_id: my-client
  client_secret: my-secret
  redirect_uri: http://localhost:8080/auth/callback
session:
  secret: "0123456789abcdef0123456789abcdef0123456789abcdef"
"#,
        provider_base_url
    )
}

/// Gateway wired against `provider_base_url`, served on an ephemeral port.
pub async fn spawn_gateway(provider_base_url: &str) -> (JoinHandle<()>, String) {
    let service_config = parse_config(gateway_yaml(provider_base_url)).await.expect("valid test config");
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .expect("reqwest client");
    let state = AppState::new(&service_config, client).await.expect("app state");
    let app = router(state, &service_config.settings.metrics);
    let (handle, addr) = spawn_axum(app).await;
    (handle, format!("http://{}", addr))
}

/// `name=value` part of the first Set-Cookie header.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(http::header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_owned)
}
