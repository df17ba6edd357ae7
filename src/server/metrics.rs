use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all service metrics
const PREFIX: &str = "spotify_insights";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upstream Metrics
    pub static ref UPSTREAM_CALLS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_calls_total"), "Calls to upstream services"),
        &["service", "endpoint", "outcome"]
    ).expect("Failed to create upstream_calls_total metric");

    // Doppelganger Metrics
    pub static ref GENERATION_ATTEMPTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_doppelganger_generation_attempts_total"),
            "Doppelganger generation attempts by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create doppelganger_generation_attempts_total metric");

    pub static ref DOPPELGANGER_RESULTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_doppelganger_results_total"),
            "Doppelganger responses by the path that produced them"
        ),
        &["path"]
    ).expect("Failed to create doppelganger_results_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_CALLS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(GENERATION_ATTEMPTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DOPPELGANGER_RESULTS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a call to Spotify or Gemini
pub fn record_upstream_call(service: &str, endpoint: &str, outcome: &str) {
    UPSTREAM_CALLS_TOTAL
        .with_label_values(&[service, endpoint, outcome])
        .inc();
}

pub fn record_generation_attempt(outcome: &str) {
    GENERATION_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// `path` is one of "generated", "fallback", "static" or "unknown_taste".
pub fn record_doppelganger_result(path: &str) {
    DOPPELGANGER_RESULTS_TOTAL.with_label_values(&[path]).inc();
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
