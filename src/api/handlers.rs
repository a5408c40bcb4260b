use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct PlaybackUrlResponse {
    pub url: String,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Issue a signed playback URL for one film.
///
/// The bearer token is pulled straight from the `Authorization` header; a
/// missing or malformed header reaches the issuer as "no credential" and is
/// rejected there, so the rejection order (auth before film id) lives in one
/// place.
pub async fn get_film_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<PlaybackUrlResponse>> {
    let token = bearer_token(&headers);
    let issued = state.playback.issue_playback_url(&id, token).await?;
    Ok(Json(PlaybackUrlResponse { url: issued.url }))
}

/// Same contract, no id path segment: still authenticated first, then
/// rejected for the missing film id.
pub async fn get_film_url_without_id(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<PlaybackUrlResponse>> {
    let token = bearer_token(&headers);
    let issued = state.playback.issue_playback_url("", token).await?;
    Ok(Json(PlaybackUrlResponse { url: issued.url }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
