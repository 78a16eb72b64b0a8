//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size (413 Payload Too Large)
//! - Bound total request time

use std::time::Duration;

use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::{SecurityConfig, TimeoutConfig};

#[allow(deprecated)]
pub fn apply_limits<S>(router: Router<S>, security: &SecurityConfig, timeouts: &TimeoutConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(RequestBodyLimitLayer::new(security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
}
