//! Store metrics collection.
//!
//! Provides standardized metrics for monitoring MongoDB operations:
//! - Request counters by collection, operation and outcome
//! - Latency histograms

use std::future::Future;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::Instrument;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total store requests by collection, operation and outcome.
    pub const REQUESTS_TOTAL: &str = "store_requests_total";

    /// Request latency in seconds by collection and operation.
    pub const LATENCY_SECONDS: &str = "store_latency_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed store request.
pub fn record_request(collection: &str, operation: &str, success: bool, latency_ms: f64) {
    let outcome = if success { "ok" } else { "error" };

    counter!(
        names::REQUESTS_TOTAL,
        "collection" => collection.to_string(),
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "collection" => collection.to_string(),
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Run a store operation inside a tracing span, recording count and latency.
pub async fn observe<T, E, F>(collection: &'static str, operation: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let span = tracing::info_span!("store_request", collection, operation);
    let start = Instant::now();
    let result = fut.instrument(span).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    record_request(collection, operation, result.is_ok(), latency_ms);
    result
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }
}
