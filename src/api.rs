use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::share::{generate_share_id, share_url, ShareRecord};
use crate::spotify::{SpotifyClient, SpotifyError};
use crate::store::{ShareStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub spotify: Arc<SpotifyClient>,
    pub shares: Arc<dyn ShareStore>,
    pub share_base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// Anything other than a non-blank string falls back to the default owner label.
    #[serde(default)]
    pub owner_name: Option<Value>,
    /// Tracks are stored exactly as submitted.
    #[serde(default)]
    pub playlist: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCreatedResponse {
    pub success: bool,
    pub share_id: String,
    pub share_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPlaylistResponse {
    pub success: bool,
    pub owner_name: String,
    pub playlist: Vec<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("q(query) is required")]
    MissingQuery,

    #[error("search failed: {0}")]
    Search(#[from] SpotifyError),

    #[error("Invalid share request: {0}")]
    InvalidShare(String),

    #[error("The playlist is empty.")]
    EmptyPlaylist,

    #[error("Playlist not found.")]
    ShareNotFound,

    #[error("share storage failed: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingQuery => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::Search(e) => {
                error!("Search failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "internal_error" }))
            }
            ApiError::InvalidShare(_) | ApiError::EmptyPlaylist => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": self.to_string() }),
            ),
            ApiError::ShareNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": self.to_string() }),
            ),
            ApiError::Store(e) => {
                error!("Share storage failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Failed to save the playlist." }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search_tracks))
        .route("/api/share", post(create_share))
        .route("/api/share/:id", get(get_share))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    info!("[REQ] {} {}", request.method(), request.uri());
    next.run(request).await
}

// GET /api/search?q= - Proxy a track search to Spotify, body passed through as-is
async fn search_tracks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let search_term = params.get("q").cloned().unwrap_or_default();

    if search_term.trim().is_empty() {
        return Err(ApiError::MissingQuery);
    }

    let body = state.spotify.search_tracks(&search_term).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

// POST /api/share - Store a new snapshot of the submitted playlist
async fn create_share(
    State(state): State<AppState>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> Result<Json<ShareCreatedResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected share request: {}", rejection.body_text());
        ApiError::InvalidShare(rejection.body_text())
    })?;

    if request.playlist.is_empty() {
        return Err(ApiError::EmptyPlaylist);
    }

    let owner_name = request.owner_name.as_ref().and_then(Value::as_str);
    let record = ShareRecord::new(owner_name, request.playlist);
    let id = generate_share_id();
    let track_count = record.playlist.len();

    state.shares.put(&id, record).await?;
    info!("Created share {} with {} tracks", id, track_count);

    Ok(Json(ShareCreatedResponse {
        success: true,
        share_url: share_url(&state.share_base_url, &id),
        share_id: id,
    }))
}

// GET /api/share/:id - Fetch a stored snapshot
async fn get_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SharedPlaylistResponse>, ApiError> {
    let record = state.shares.get(&id).await?.ok_or(ApiError::ShareNotFound)?;

    Ok(Json(SharedPlaylistResponse {
        success: true,
        owner_name: record.owner_name().to_string(),
        playlist: record.playlist,
    }))
}
