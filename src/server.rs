//! HTTP API server.
//!
//! Exposes the interview session endpoints as a JSON HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/save-job-info` | Save job details (overwrites previous) |
//! | `GET`  | `/get-job-info` | Return saved job details |
//! | `GET`  | `/generate-problems` | Generate interview questions |
//! | `POST` | `/upload` | Upload audio, transcribe and evaluate it |
//! | `POST` | `/analyze-video` | Upload video, run emotion analysis |
//! | `POST` | `/generate-report` | Assemble the final report |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Generation flows respond with either their schema-valid payload or an
//! object containing only an `error` key; nothing here is fatal to the
//! serving process. The retriever and report assembler additionally
//! collapse "no data" and "operation failed" into the same empty/failed
//! shape — callers cannot tell them apart, by contract.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::emotion;
use crate::evaluate;
use crate::models::{JobInfo, TranscriptEntry};
use crate::outcome::{outcome_to_value, Failure};
use crate::questions;
use crate::report;
use crate::state::{SessionState, SharedSession};
use crate::transcription;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    session: SharedSession,
}

/// Maximum accepted upload size (videos included).
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Build the application router with a fresh session.
pub fn app(config: Arc<Config>) -> Router {
    let state = AppState {
        config,
        session: SessionState::shared(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/save-job-info", post(handle_save_job_info))
        .route("/get-job-info", get(handle_get_job_info))
        .route("/generate-problems", get(handle_generate_problems))
        .route("/upload", post(handle_upload_audio))
        .route("/analyze-video", post(handle_analyze_video))
        .route("/generate-report", post(handle_generate_report))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured bind address. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let router = app(Arc::new(config.clone()));

    println!("Interview Harness listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /save-job-info ============

/// Stores the job details, overwriting any previous save, and echoes
/// them back.
async fn handle_save_job_info(
    State(state): State<AppState>,
    Json(info): Json<JobInfo>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.save_job_info(info.clone());
    Json(json!({ "message": "Job details saved", "data": info }))
}

// ============ GET /get-job-info ============

async fn handle_get_job_info(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    match &session.job_info {
        Some(info) => Json(json!({ "job_info": info })),
        None => Json(json!({ "message": "No job info saved yet." })),
    }
}

// ============ GET /generate-problems ============

/// Generates interview questions from the saved job details. The result
/// — success or error shaped — is stored as the session's question set
/// and returned as-is.
async fn handle_generate_problems(State(state): State<AppState>) -> impl IntoResponse {
    let details = state.session.read().await.job_info.clone();

    let outcome = questions::generate_questions(&state.config, details.as_ref()).await;
    let value = outcome_to_value(&outcome);

    state.session.write().await.question_set = Some(value.clone());
    Json(value)
}

// ============ POST /upload ============

/// Accepts a multipart audio upload, transcribes it, evaluates the
/// transcript, and appends both under a fresh timestamp key.
async fn handle_upload_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let audio = match field_bytes(multipart, "audio").await {
        Ok(bytes) => bytes,
        Err(failure) => return Json(failure.to_body()),
    };

    let transcript_text = match transcription::transcribe(&state.config.transcription, audio).await
    {
        Ok(text) => text,
        Err(e) => return Json(json!({ "error": e.to_string() })),
    };

    let analysis =
        outcome_to_value(&evaluate::evaluate_transcript(&state.config, &transcript_text).await);

    // Microsecond-resolution key; a same-microsecond collision would
    // overwrite, treated as out of scope.
    let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

    let mut session = state.session.write().await;
    session.append_transcript(
        timestamp.clone(),
        TranscriptEntry {
            transcription: transcript_text.clone(),
            analysis: analysis.clone(),
        },
    );

    Json(json!({
        "timestamp": timestamp,
        "transcription": transcript_text,
        "analysis": analysis,
        "job_info_used": session.job_info,
    }))
}

// ============ POST /analyze-video ============

async fn handle_analyze_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let video = match field_bytes(multipart, "video").await {
        Ok(bytes) => bytes,
        Err(failure) => return Json(failure.to_body()),
    };

    match emotion::analyze_video(&state.config.emotion, &video).await {
        Ok(summary) => {
            let mut session = state.session.write().await;
            session.video_analysis = Some(summary.clone());
            Json(json!({
                "message": "Video processed successfully",
                "total_frames": summary.total_frames,
                "frames_analyzed": summary.frames_analyzed,
                "emotions": summary.emotions,
            }))
        }
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

// ============ POST /generate-report ============

async fn handle_generate_report(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await.clone();

    match report::generate_report(&state.config, &session).await {
        Some(report) => Json(json!({
            "message": "Report generated successfully",
            "report": report,
        })),
        None => Json(json!({ "message": "Failed to generate report" })),
    }
}

// ============ helpers ============

/// Read the bytes of the named multipart field, falling back to the
/// first file-bearing field when the name doesn't match.
async fn field_bytes(mut multipart: Multipart, name: &str) -> Result<Vec<u8>, Failure> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Failure::missing_input(format!("invalid multipart body: {}", e)))?
    {
        let matches = field.name() == Some(name) || field.file_name().is_some();
        if !matches {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Failure::missing_input(format!("failed to read upload: {}", e)))?;
        return Ok(bytes.to_vec());
    }

    Err(Failure::missing_input(format!(
        "missing '{}' file field",
        name
    )))
}
