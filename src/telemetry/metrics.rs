//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "voss_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "voss_http_request_duration_seconds";
pub const HTTP_REQUESTS_IN_FLIGHT: &str = "voss_http_requests_in_flight";
pub const AUTH_LOGIN_TOTAL: &str = "voss_auth_login_total";
pub const AUTH_TOKEN_RESOLUTION_TOTAL: &str = "voss_auth_token_resolution_total";
pub const AUTHZ_DECISIONS_TOTAL: &str = "voss_authz_decisions_total";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit zero values so HELP/TYPE lines are
/// present from startup.
pub fn describe_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        HTTP_REQUESTS_IN_FLIGHT,
        "Number of HTTP requests currently being processed"
    );

    describe_counter!(AUTH_LOGIN_TOTAL, "Login attempts by pool and result");
    describe_counter!(
        AUTH_TOKEN_RESOLUTION_TOTAL,
        "Bearer token resolutions by result"
    );
    describe_counter!(
        AUTHZ_DECISIONS_TOTAL,
        "Authorization decisions by action and outcome"
    );

    counter!(AUTH_LOGIN_TOTAL, "pool" => "user", "result" => "success").absolute(0);
    counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "resolved").absolute(0);
    counter!(AUTHZ_DECISIONS_TOTAL, "action" => "product_create", "outcome" => "allow")
        .absolute(0);
    gauge!(HTTP_REQUESTS_IN_FLIGHT).set(0.0);
}
