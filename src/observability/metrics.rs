//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rule_evaluations_total` (counter): outcomes by rule and result
//!   (`match`, `no_match`, `error`)
//! - `rule_evaluation_duration_seconds` (histogram): time to evaluate all rules
//! - `config_reloads_total` (counter): reload attempts by result
//!
//! # Design Decisions
//! - Recorded by the HTTP layer; condition evaluation itself stays silent
//! - Without an installed recorder every call is a no-op

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::condition::EvalError;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one rule.
pub fn record_rule(rule: &str, result: &Result<bool, EvalError>) {
    let label = match result {
        Ok(true) => "match",
        Ok(false) => "no_match",
        Err(_) => "error",
    };
    metrics::counter!(
        "rule_evaluations_total",
        "rule" => rule.to_string(),
        "result" => label
    )
    .increment(1);
}

/// Record how long evaluating the rule table took for one request.
pub fn record_evaluation_duration(start: Instant) {
    metrics::histogram!("rule_evaluation_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a config reload attempt.
pub fn record_config_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("config_reloads_total", "result" => result).increment(1);
}
