//! Per-request metrics and access logging.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::TenantSubdomain;

pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = req.request_id().to_string();
    let tenant = req
        .extensions()
        .get::<TenantSubdomain>()
        .map(|t| t.0.clone());

    let res = next.run(req).await;
    let status = res.status().as_u16();
    metrics::record_request(&method, status, start);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        tenant = tenant.as_deref().unwrap_or("-"),
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    res
}
