//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wedsite_http_requests_total` (counter): requests by method, status
//! - `wedsite_http_request_duration_seconds` (histogram): latency distribution
//! - `wedsite_tenant_rewrites_total` (counter): hostname rewrites
//! - `wedsite_publish_total` (counter): successful publishes by mode
//! - `wedsite_publish_failures_total` (counter): rejected cache uploads
//! - `wedsite_publish_duration_seconds` (histogram): publish pipeline latency
//! - `wedsite_rsvp_total` (counter): accepted RSVPs by attending
//! - `wedsite_sites` (gauge): sites in the store
//!
//! Recording is a no-op until a recorder is installed, so tests and the CLI
//! never need one.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve a Prometheus scrape endpoint on `addr`. Must run inside a Tokio
/// runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "wedsite_http_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "wedsite_http_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_tenant_rewrite() {
    counter!("wedsite_tenant_rewrites_total").increment(1);
}

pub fn record_publish(mode: &'static str, start: Instant) {
    counter!("wedsite_publish_total", "mode" => mode).increment(1);
    histogram!("wedsite_publish_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_publish_failure() {
    counter!("wedsite_publish_failures_total").increment(1);
}

pub fn record_rsvp(attending: bool) {
    let attending = if attending { "yes" } else { "no" };
    counter!("wedsite_rsvp_total", "attending" => attending).increment(1);
}

pub fn record_site_count(count: usize) {
    gauge!("wedsite_sites").set(count as f64);
}
