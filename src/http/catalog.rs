use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::http::response::ok;
use crate::http::server::AppState;
use crate::templates::{catalog, TemplateDescriptor};

/// `GET /api/templates`
pub async fn list_templates() -> Response {
    ok(catalog().collect::<Vec<&TemplateDescriptor>>())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub sites: usize,
    pub cache_configured: bool,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sites: state.store.count(),
        cache_configured: state.publisher.cache_configured(),
    })
}
