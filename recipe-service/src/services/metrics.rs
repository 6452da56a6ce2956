//! Prometheus metrics for recipe-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec, TextEncoder,
};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "recipe_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Random-recipe lookups by category and outcome.
pub static RECIPE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "recipe_lookups_total",
        "Total number of random recipe lookups",
        &["category", "outcome"] // outcome: ok, invalid_category, not_found, unavailable, error
    )
    .expect("Failed to register recipe_lookups_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&RECIPE_LOOKUPS_TOTAL);
}

/// Count one lookup. Unknown categories share a single label value.
pub fn record_lookup(category: &str, outcome: &str) {
    RECIPE_LOOKUPS_TOTAL
        .with_label_values(&[category, outcome])
        .inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
