//! Sites CRUD handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::http::request::ApiJson;
use crate::http::response::{created, ok};
use crate::http::server::AppState;
use crate::sites::types::NewPhotoInput;
use crate::sites::{CreateWebsiteInput, UpdateWebsiteInput};

/// Malformed ids cannot name a site, so they are reported as not found.
pub(crate) fn parse_website_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::website_not_found(raw))
}

pub async fn list_websites(State(state): State<AppState>) -> Response {
    ok(state.store.list())
}

pub async fn create_website(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateWebsiteInput>,
) -> AppResult<Response> {
    let website = state.store.create(input.validate()?)?;
    tracing::info!(
        website_id = %website.id,
        subdomain = %website.subdomain,
        template = %website.template_id,
        "Website created"
    );
    Ok(created(website))
}

pub async fn get_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    Ok(ok(state.store.get(id)?))
}

pub async fn update_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateWebsiteInput>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    let website = state.store.update(id, input)?;
    tracing::info!(website_id = %id, "Website updated");
    Ok(ok(website))
}

pub async fn delete_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    Ok(ok(state.store.delete(id)?))
}

pub async fn add_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NewPhotoInput>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    let photo = state.store.add_photo(id, input.validate()?)?;
    Ok(created(photo))
}

pub async fn list_rsvps(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    Ok(ok(state.store.rsvps_for(id)?))
}
