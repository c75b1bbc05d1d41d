//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "jboard_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jboard_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jboard_http_requests_in_flight";

    // Domain metrics
    pub const JOBS_CREATED_TOTAL: &str = "jboard_jobs_created_total";
    pub const APPLICATIONS_CREATED_TOTAL: &str = "jboard_applications_created_total";
    pub const RESUME_UPLOAD_DURATION_SECONDS: &str = "jboard_resume_upload_duration_seconds";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "jboard_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a created job posting.
pub fn record_job_created() {
    counter!(names::JOBS_CREATED_TOTAL).increment(1);
}

/// Record a created application.
pub fn record_application_created() {
    counter!(names::APPLICATIONS_CREATED_TOTAL).increment(1);
}

/// Record resume upload duration.
pub fn record_resume_upload_duration(duration_secs: f64) {
    histogram!(names::RESUME_UPLOAD_DURATION_SECONDS).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels: collapse document ids so label
/// cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    let path = regex::Regex::new(r"/[0-9a-fA-F]{24}(/|$)")
        .unwrap()
        .replace_all(path, "/:id$1");
    let path = regex::Regex::new(r"/[0-9]+(/|$)")
        .unwrap()
        .replace_all(&path, "/:id$1");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/jobs/64b0c8f2a1d2e3f4a5b6c7d8"),
            "/api/jobs/:id"
        );
        assert_eq!(
            sanitize_path("/api/applications/64b0c8f2a1d2e3f4a5b6c7d8/status"),
            "/api/applications/:id/status"
        );
        assert_eq!(sanitize_path("/api/jobs"), "/api/jobs");
    }
}
