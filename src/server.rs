use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::analysis::Analyzer;
use crate::error::{Error, Result};
use crate::genius::CatalogClient;
use crate::lyrics::{PageFetcher, lyrics_from_html};
use crate::models::{AnalysisResult, SearchHit, SongDetail, SongResponse};

/// Collaborators shared by all handlers. Built once in `main`, or from
/// test doubles.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub pages: Arc<dyn PageFetcher>,
    pub analyzer: Arc<Analyzer>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/song", get(song_without_id))
        .route("/song/", get(song_without_id))
        .route("/song/:id", get(song))
        .route("/analyze", post(analyze).fallback(method_not_allowed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// --- UI ---

async fn index() -> Html<&'static str> {
    Html(include_str!("ui.html"))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// --- Search ---

#[derive(Debug, Deserialize)]
struct SearchParams {
    title: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchHit>>> {
    let title = params
        .ok()
        .and_then(|Query(p)| p.title)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::Validation("Missing title".to_string()))?;

    let songs = state
        .catalog
        .search(&title)
        .await
        .inspect_err(|e| error!("SEARCH ERROR: {}", e))?;

    Ok(Json(songs.into_iter().map(SearchHit::from).collect()))
}

// --- Song ---

fn missing_song_id() -> Error {
    Error::Validation("Missing song id".to_string())
}

async fn song_without_id() -> Error {
    missing_song_id()
}

async fn song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SongResponse>> {
    let id = id.trim();
    if id.is_empty() {
        return Err(missing_song_id());
    }

    let detail = load_song(&state, id)
        .await
        .inspect_err(|e| error!("SONG ERROR: {}", e))?;

    Ok(Json(detail.into()))
}

async fn load_song(state: &AppState, id: &str) -> Result<SongDetail> {
    let metadata = state.catalog.song(id).await?;
    let html = state.pages.fetch(&metadata.page_url).await?;
    let lyrics = lyrics_from_html(&html);
    if lyrics.is_empty() {
        info!("No lyrics found on {}", metadata.page_url);
    }
    Ok(SongDetail { metadata, lyrics })
}

// --- Analysis ---

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    lyrics: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>> {
    let lyrics = body
        .ok()
        .and_then(|Json(b)| b.lyrics)
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| Error::Validation("Missing lyrics".to_string()))?;

    let result = state
        .analyzer
        .analyze(&lyrics)
        .await
        .inspect_err(|e| error!("ANALYSIS ERROR: {}", e))?;

    Ok(Json(result))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
