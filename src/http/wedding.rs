//! Canonical tenant render route, `GET /<prefix>/{subdomain}`.
//!
//! # Responsibilities
//! - Resolve the subdomain to a published site
//! - Render the site's template into a full HTML document
//! - Serve a distinguishable 404 page for every other case
//!
//! # Design Decisions
//! - Unknown, malformed and unpublished subdomains share one 404 page and
//!   differ only in logs
//! - The publish pipeline's own fetch may render an unpublished site by
//!   presenting the publisher's render token

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::error::AppError;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::publish::RENDER_TOKEN_HEADER;
use crate::sites::Subdomain;

pub const X_WEDDING_SITE: &str = "x-wedding-site";

pub async fn render_site(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request_id = headers.request_id();
    let lookup = raw.to_lowercase();

    if let Err(reason) = Subdomain::parse(&lookup) {
        tracing::debug!(request_id, subdomain = %raw, reason = %reason, "Malformed subdomain");
        return not_found(&state, &raw);
    }
    let Some(website) = state.store.find_by_subdomain(&lookup) else {
        tracing::debug!(request_id, subdomain = %lookup, "Unknown subdomain");
        return not_found(&state, &lookup);
    };
    if !website.published && !has_render_token(&state, &headers) {
        tracing::debug!(request_id, subdomain = %lookup, "Site not published");
        return not_found(&state, &lookup);
    }

    let rsvps = state.store.rsvps_for(website.id).unwrap_or_default();
    let html = match state
        .renderer
        .render_site(&website, &rsvps, &state.config.api_url())
    {
        Ok(html) => html,
        Err(e) => return AppError::from(e).into_response(),
    };

    let mut res = Html(html).into_response();
    if let Ok(value) = HeaderValue::from_str(website.subdomain.as_str()) {
        res.headers_mut().insert(X_WEDDING_SITE, value);
    }
    res
}

fn has_render_token(state: &AppState, headers: &HeaderMap) -> bool {
    headers
        .get(RENDER_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|presented| presented == state.publisher.render_token())
}

fn not_found(state: &AppState, subdomain: &str) -> Response {
    match state.renderer.render_not_found(subdomain) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render not-found page");
            (StatusCode::NOT_FOUND, "Wedding website not found").into_response()
        }
    }
}
