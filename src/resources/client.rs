use http::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::token::TokenRecord;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::resources::models::Envelope;

/// Bearer-authenticated calls to the provider's resource APIs.
///
/// Never refreshes tokens itself: a 401 comes back as
/// `GatewayError::Upstream` and the caller decides.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    base_url: String,
    client: Client,
}

impl ResourceClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn authorized(&self, request: RequestBuilder, token: &TokenRecord) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token))
            .header(ACCEPT, "application/json")
    }

    /// GET `path` and unwrap the `data` envelope.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        api: &'static str,
        token: &TokenRecord,
        path: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        let request = self.authorized(self.client.get(self.url(path)), token).query(query);
        let (status, body) = self.send(api, request).await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| GatewayError::Upstream {
                message: format!("malformed {} response: {}", api, e),
                status,
                body,
            })
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    /// Send and fail on any non-2xx. Returns the status and raw body.
    pub(crate) async fn send(
        &self,
        api: &'static str,
        request: RequestBuilder,
    ) -> GatewayResult<(StatusCode, String)> {
        let metrics = get_metrics().await;
        let start = get_instant();

        let response = request.send().await.inspect_err(|e| {
            warn!(api, "resource api unreachable: {}", e);
            metrics.upstream_requests.with_label_values(&[api, "transport_error"]).inc();
        })?;
        let status = response.status();
        let body = response.text().await?;

        metrics
            .upstream_requests
            .with_label_values(&[api, status.as_str()])
            .inc();
        metrics
            .upstream_duration
            .with_label_values(&[api])
            .observe(start.elapsed().as_secs_f64());
        debug!(api, status = %status, "resource api responded");

        if !status.is_success() {
            warn!(api, status = %status, "resource api call failed");
            return Err(GatewayError::Upstream {
                message: upstream_message(api, status, &body),
                status,
                body,
            });
        }
        Ok((status, body))
    }
}

/// Best-effort human message from a provider error body.
fn upstream_message(api: &str, status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            [
                "/errors/reason",
                "/error_description",
                "/error",
                "/message",
            ]
            .iter()
            .find_map(|pointer| json.pointer(pointer).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| format!("{} returned {}", api, status))
}
