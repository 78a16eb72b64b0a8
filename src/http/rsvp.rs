//! Guest RSVP submission.
//!
//! Tenant pages served from the edge cache live on another origin, so this
//! route carries permissive CORS (see `server.rs`).

use axum::{extract::State, response::Response};

use crate::error::AppResult;
use crate::http::request::ApiJson;
use crate::http::response::created;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::sites::RsvpSubmission;

/// `POST /api/rsvp`
pub async fn submit_rsvp(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<RsvpSubmission>,
) -> AppResult<Response> {
    let rsvp = state.store.add_rsvp(submission.validate()?)?;
    metrics::record_rsvp(rsvp.attending);
    tracing::info!(
        website_id = %rsvp.website_id,
        rsvp_id = %rsvp.id,
        attending = rsvp.attending,
        "RSVP received"
    );
    Ok(created(rsvp))
}
