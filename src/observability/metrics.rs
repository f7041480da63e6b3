use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Resource API metrics
    pub upstream_requests: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Token endpoint metrics
    pub token_grants: IntCounterVec,
    pub token_grant_failures: IntCounterVec,

    // Session metrics
    pub active_user_sessions: IntGauge,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("krogergateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Resource APIs
            upstream_requests: IntCounterVec::new(Opts::new("upstream_requests_total", "Resource API calls by api and response status"), &["api", "status"]).unwrap(),
            upstream_duration: HistogramVec::new(HistogramOpts::new("upstream_request_duration_seconds", "Resource API call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["api"]).unwrap(),

            // Token endpoint
            token_grants: IntCounterVec::new(Opts::new("token_grants_total", "Token endpoint requests by grant type"), &["grant"]).unwrap(),
            token_grant_failures: IntCounterVec::new(Opts::new("token_grant_failures_total", "Token endpoint failures by grant type"), &["grant"]).unwrap(),

            active_user_sessions: IntGauge::new("active_user_sessions", "Sessions holding a user token").unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.upstream_requests.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_grants.clone())).unwrap();
        reg.register(Box::new(metrics.token_grant_failures.clone())).unwrap();
        reg.register(Box::new(metrics.active_user_sessions.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
