//! Prometheus metrics exposition
//!
//! - `rover_exchanges_total` (counter): labels `mode`, `outcome`
//! - `rover_exchange_duration_seconds` (histogram): label `mode`
//! - `rover_upstream_errors_total` (counter): label `error_type`
//! - `rover_profile_fetches_total` (counter): label `result`

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Builder with the exchange histogram configured as real buckets rather
/// than the exporter's default summary.
fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("rover_exchange_duration_seconds".to_string()),
        DURATION_BUCKETS,
    )
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    builder()?.install_recorder()
}

/// Record a finished login exchange. `mode` is `none` for missing input.
pub fn record_exchange(mode: &'static str, outcome: &'static str, duration_secs: f64) {
    metrics::counter!("rover_exchanges_total", "mode" => mode, "outcome" => outcome).increment(1);
    metrics::histogram!("rover_exchange_duration_seconds", "mode" => mode).record(duration_secs);
}

/// Record a failed provider call with its classification.
pub fn record_upstream_error(error_type: &'static str) {
    metrics::counter!("rover_upstream_errors_total", "error_type" => error_type).increment(1);
}

pub fn record_profile_fetch(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("rover_profile_fetches_total", "result" => result).increment(1);
}
