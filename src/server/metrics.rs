use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Steamlens metrics
const PREFIX: &str = "steamlens";

lazy_static! {
    // Global Prometheus registry
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
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Store Metrics
    pub static ref STORE_QUERY_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_store_query_duration_seconds"),
            "Game database unit-of-work duration in seconds"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["operation"]
    ).expect("Failed to create store_query_duration_seconds metric");

    pub static ref STORE_CONNECTION_ERRORS_TOTAL: Counter = Counter::new(
        format!("{PREFIX}_store_connection_errors_total"),
        "Total game database connection errors"
    ).expect("Failed to create store_connection_errors_total metric");

    // Snapshot Cache Metrics
    pub static ref SNAPSHOT_CACHE_HITS_TOTAL: Counter = Counter::new(
        format!("{PREFIX}_snapshot_cache_hits_total"),
        "Selection snapshots served from the cache slot"
    ).expect("Failed to create snapshot_cache_hits_total metric");

    pub static ref SNAPSHOT_CACHE_MISSES_TOTAL: Counter = Counter::new(
        format!("{PREFIX}_snapshot_cache_misses_total"),
        "Selection snapshots rebuilt on cache miss"
    ).expect("Failed to create snapshot_cache_misses_total metric");

    // Catalog Metrics
    pub static ref CATALOG_TAGS_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_tags_total"),
        "Tags in the tag catalog at startup"
    ).expect("Failed to create catalog_tags_total metric");

    pub static ref CATALOG_CATEGORIES_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_categories_total"),
        "Configured sentiment categories"
    ).expect("Failed to create catalog_categories_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(STORE_QUERY_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(STORE_CONNECTION_ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(SNAPSHOT_CACHE_HITS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(SNAPSHOT_CACHE_MISSES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_TAGS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_CATEGORIES_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record catalog sizes discovered at startup
pub fn init_catalog_metrics(num_tags: usize, num_categories: usize) {
    CATALOG_TAGS_TOTAL.set(num_tags as f64);
    CATALOG_CATEGORIES_TOTAL.set(num_categories as f64);

    tracing::info!(
        "Catalog metrics initialized: {} tags, {} categories",
        num_tags,
        num_categories
    );
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

/// Record one store unit of work
pub fn record_store_query(operation: &str, duration: Duration) {
    STORE_QUERY_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Record a store connection error
pub fn record_store_connection_error() {
    STORE_CONNECTION_ERRORS_TOTAL.inc();
}

/// Record a snapshot served from the cache slot
pub fn record_snapshot_cache_hit() {
    SNAPSHOT_CACHE_HITS_TOTAL.inc();
}

/// Record a snapshot rebuild
pub fn record_snapshot_cache_miss() {
    SNAPSHOT_CACHE_MISSES_TOTAL.inc();
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
