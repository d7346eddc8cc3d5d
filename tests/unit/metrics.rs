//! Unit tests for Prometheus metrics export

use coindash::metrics::Metrics;

#[test]
fn export_contains_registered_metrics() {
    let metrics = Metrics::new().expect("metrics initialization");
    metrics.http_requests_total.inc();
    metrics.http_request_duration_seconds.observe(0.01);

    let output = metrics.export().expect("export");
    assert!(output.contains("http_requests_total"));
    assert!(output.contains("http_request_duration_seconds"));
    assert!(output.contains("http_requests_in_flight"));
}
