//! HTTP server for the onboarding copilot

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::engine::{StandupEngine, UpstreamError};
use crate::types::{AgentReply, PlanOutcome, ProgressEntry, StandupMapping};

/// Uploaded recordings can be large; multipart bodies are capped here
/// rather than at axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const DEFAULT_USER_ID: &str = "new_engineer";

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
struct TranscribeResponse {
    success: bool,
    transcript: String,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    #[serde(flatten)]
    mapping: StandupMapping,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StandupRequest {
    transcript: String,
    user_id: Option<String>,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: String,
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AgentResponse {
    success: bool,
    #[serde(flatten)]
    reply: AgentReply,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRequest {
    role: String,
    background: Option<String>,
    voice_transcript: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    success: bool,
    #[serde(flatten)]
    outcome: PlanOutcome,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressQuery {
    user_id: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn upstream_error(e: UpstreamError) -> ApiError {
    error!("Upstream failure: {}", e);
    let label = match e {
        UpstreamError::Transcription(_) => "Transcription failed",
        UpstreamError::Reference { .. } => "Reference data fetch failed",
        UpstreamError::Agent(_) => "Agent invocation failed",
    };
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            success: false,
            error: label.to_string(),
            details: Some(e.to_string()),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
            details: None,
        }),
    )
}

/// Pull the audio field (and optional userId) out of a multipart upload
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, String, Option<String>), ApiError> {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| bad_request("Malformed multipart upload"))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("audio") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("audio/mp4")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| bad_request("Failed to read audio field"))?;
                audio = Some((bytes.to_vec(), content_type));
            }
            Some("userId") => {
                user_id = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (bytes, content_type) = audio.ok_or_else(|| bad_request("audio field is required"))?;
    Ok((bytes, content_type, user_id))
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "onboarding-copilot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Transcribe an uploaded recording
async fn transcribe_handler(
    State(engine): State<Arc<StandupEngine>>,
    multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let (audio, content_type, _) = read_upload(multipart).await?;

    let transcript = engine
        .transcribe(audio, &content_type)
        .await
        .map_err(upstream_error)?;

    Ok(Json(TranscribeResponse {
        success: true,
        transcript,
    }))
}

/// Full upload flow: transcribe, fetch reference data, run the mapping core
async fn upload_video_handler(
    State(engine): State<Arc<StandupEngine>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (audio, content_type, user_id) = read_upload(multipart).await?;
    let user_id = user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    let mapping = engine
        .process_upload(audio, &content_type, user_id)
        .await
        .map_err(upstream_error)?;

    Ok(Json(UploadResponse {
        success: true,
        mapping,
    }))
}

/// Hand a transcript to the agent for autonomous tool-driven processing
async fn process_standup_handler(
    State(engine): State<Arc<StandupEngine>>,
    Json(req): Json<StandupRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    info!(
        "Received standup request: user_id={:?}, transcript={} chars",
        req.user_id,
        req.transcript.len()
    );

    let user_id = req.user_id.as_deref().unwrap_or("new_joiner");
    let reply = engine
        .process_standup(&req.transcript, user_id, req.session_id)
        .await
        .map_err(upstream_error)?;

    Ok(Json(AgentResponse {
        success: true,
        reply,
    }))
}

/// Continue an agent conversation
async fn agent_chat_handler(
    State(engine): State<Arc<StandupEngine>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    let session_id = req
        .session_id
        .ok_or_else(|| bad_request("sessionId is required for continuing conversation"))?;

    let reply = engine
        .continue_chat(&req.message, &session_id)
        .await
        .map_err(upstream_error)?;

    Ok(Json(AgentResponse {
        success: true,
        reply,
    }))
}

/// Generate and persist a personalized onboarding plan
async fn generate_plan_handler(
    State(engine): State<Arc<StandupEngine>>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let background = req
        .background
        .or(req.voice_transcript)
        .unwrap_or_default();

    let outcome = engine
        .generate_plan(&req.role, &background)
        .await
        .map_err(upstream_error)?;

    Ok(Json(PlanResponse {
        success: true,
        outcome,
    }))
}

/// Log a daily progress entry
async fn log_progress_handler(
    State(engine): State<Arc<StandupEngine>>,
    Json(entry): Json<ProgressEntry>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = engine.log_progress(&entry).await.map_err(upstream_error)?;
    Ok(Json(result))
}

/// Read progress entries for the manager dashboard
async fn progress_handler(
    State(engine): State<Arc<StandupEngine>>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = engine
        .progress(query.user_id.as_deref())
        .await
        .map_err(upstream_error)?;
    Ok(Json(result))
}

/// Create and configure the HTTP server
pub fn create_router(engine: Arc<StandupEngine>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/transcribe", post(transcribe_handler))
        .route("/api/upload-video", post(upload_video_handler))
        .route("/api/process-standup-agent", post(process_standup_handler))
        .route("/api/agent-chat", post(agent_chat_handler))
        .route("/api/generate-plan", post(generate_plan_handler))
        .route("/api/log-progress", post(log_progress_handler))
        .route("/api/progress", get(progress_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: Arc<StandupEngine>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting onboarding copilot server on {}", addr);

    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✓ Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
