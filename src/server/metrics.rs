use super::state::GuardedCatalog;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, IntCounter, Opts,
    Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all bookrec metrics
const PREFIX: &str = "bookrec";

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
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Dataset Metrics
    pub static ref DATASET_ITEMS_TOTAL: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_dataset_items_total"), "Total items in the loaded dataset"),
        &["type"]
    ).expect("Failed to create dataset_items_total metric");

    // Lookup cache, refreshed on scrape
    pub static ref LOOKUP_CACHE_HITS: Gauge = Gauge::new(
        format!("{PREFIX}_lookup_cache_hits"),
        "Catalog lookups served from the memo cache"
    ).expect("Failed to create lookup_cache_hits metric");

    pub static ref LOOKUP_CACHE_MISSES: Gauge = Gauge::new(
        format!("{PREFIX}_lookup_cache_misses"),
        "Catalog lookups that missed the memo cache"
    ).expect("Failed to create lookup_cache_misses metric");

    pub static ref LOOKUP_CACHE_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_lookup_cache_entries"),
        "Entries currently held by the memo cache"
    ).expect("Failed to create lookup_cache_entries metric");

    // Recommendation Metrics
    pub static ref RECOMMENDATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_recommendations_total"), "Recommendation requests by outcome"),
        &["outcome"]
    ).expect("Failed to create recommendations_total metric");

    pub static ref UNRESOLVED_RECOMMENDATIONS_TOTAL: IntCounter = IntCounter::new(
        format!("{PREFIX}_unresolved_recommendations_total"),
        "Recommended titles skipped because they have no catalog record"
    ).expect("Failed to create unresolved_recommendations_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(DATASET_ITEMS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LOOKUP_CACHE_HITS.clone()));
    let _ = REGISTRY.register(Box::new(LOOKUP_CACHE_MISSES.clone()));
    let _ = REGISTRY.register(Box::new(LOOKUP_CACHE_ENTRIES.clone()));
    let _ = REGISTRY.register(Box::new(RECOMMENDATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UNRESOLVED_RECOMMENDATIONS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_dataset_metrics(num_books: usize, num_popular: usize, num_known_titles: usize) {
    DATASET_ITEMS_TOTAL
        .with_label_values(&["book"])
        .set(num_books as f64);
    DATASET_ITEMS_TOTAL
        .with_label_values(&["popular"])
        .set(num_popular as f64);
    DATASET_ITEMS_TOTAL
        .with_label_values(&["known_title"])
        .set(num_known_titles as f64);

    tracing::info!(
        "Dataset metrics initialized: {} books, {} popular, {} known titles",
        num_books,
        num_popular,
        num_known_titles
    );
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Outcome is one of "served", "empty_input", "unknown_title".
pub fn record_recommendation(outcome: &str, unresolved: usize) {
    RECOMMENDATIONS_TOTAL.with_label_values(&[outcome]).inc();
    UNRESOLVED_RECOMMENDATIONS_TOTAL.inc_by(unresolved as u64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(catalog): State<GuardedCatalog>) -> impl IntoResponse {
    let cache_stats = catalog.cache_stats();
    LOOKUP_CACHE_HITS.set(cache_stats.hits as f64);
    LOOKUP_CACHE_MISSES.set(cache_stats.misses as f64);
    LOOKUP_CACHE_ENTRIES.set(cache_stats.len as f64);

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
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
