//! Publish and unpublish handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult, ValidationErrors};
use crate::http::request::ApiJson;
use crate::http::response::{ok, ApiResponse};
use crate::http::server::AppState;
use crate::http::sites::parse_website_id;
use crate::publish::PublishOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub website_id: String,
}

/// `POST /api/deploy`
pub async fn deploy(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DeployRequest>,
) -> AppResult<Response> {
    if req.website_id.trim().is_empty() {
        return Err(AppError::Validation(ValidationErrors::single(
            "websiteId",
            "must not be empty",
        )));
    }
    let id = parse_website_id(&req.website_id)?;
    Ok(publish_response(state.publisher.publish(id).await?))
}

/// `POST /api/websites/{id}/publish`
pub async fn publish_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    Ok(publish_response(state.publisher.publish(id).await?))
}

/// `POST /api/websites/{id}/unpublish`
pub async fn unpublish_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_website_id(&id)?;
    Ok(ok(state.publisher.unpublish(id).await?))
}

fn publish_response(outcome: PublishOutcome) -> Response {
    let message = outcome.message.clone();
    Json(ApiResponse::ok(outcome).with_message(message)).into_response()
}
