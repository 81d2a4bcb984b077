//! Request handlers and wire types.

use super::AppState;
use crate::agent::ScriptRequest;
use crate::error::Result;
use crate::youtube::{FetchedVideo, VideoSearchQuery};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoListResponse {
    pub videos: Vec<FetchedVideo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub script: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptRequest {
    pub video_urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub transcripts: Vec<String>,
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to the {} API!", state.orchestrator.settings().server.project_name)
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /agent/fetch-videos`
pub async fn fetch_videos(
    State(state): State<Arc<AppState>>,
    Json(query): Json<VideoSearchQuery>,
) -> Result<Json<VideoListResponse>> {
    let videos = state.orchestrator.fetch_videos(&query).await?;
    Ok(Json(VideoListResponse { videos }))
}

/// `POST /agent/create-script`
pub async fn create_script(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScriptRequest>,
) -> Result<Json<ScriptResponse>> {
    let script = state.orchestrator.create_script(&request).await?;
    Ok(Json(ScriptResponse { script }))
}

/// `POST /transcript/create`
pub async fn create_transcript(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranscriptRequest>,
) -> Result<Json<TranscriptResponse>> {
    let transcripts = state
        .orchestrator
        .create_transcripts(&request.video_urls)
        .await?;
    Ok(Json(TranscriptResponse { transcripts }))
}
