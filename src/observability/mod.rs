//! Logs and metrics.
//!
//! # Data Flow
//! ```text
//! Handlers, router, store, publish pipeline
//!     → logging.rs (tracing events, request spans carry the request id)
//!     → metrics.rs (request, publish, RSVP and rewrite series)
//!
//! Output:
//!     → stdout, pretty or JSON per `observability.log_format`
//!     → Prometheus exporter on `observability.metrics_address`
//! ```

pub mod logging;
pub mod metrics;
