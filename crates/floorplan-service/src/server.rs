//! HTTP server for the voice-to-plan endpoints

use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::orchestrator::{DrawingService, LABEL_SHA256};
use crate::types::{
    download_url, FileListResponse, GenerateRequest, GenerateResponse, HealthResponse,
    ParametersResponse, TranscriptRequest, TranscriptResponse, VoiceToPlanResponse,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use room_extraction::{ParameterExtractor, Transcriber};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Form field carrying the uploaded recording
const AUDIO_FIELD: &str = "audio_file";

/// Shared state for the HTTP server
pub struct ServerState {
    pub drawings: DrawingService,
    pub extractor: Arc<dyn ParameterExtractor>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub config: ServiceConfig,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(
        drawings: DrawingService,
        extractor: Arc<dyn ParameterExtractor>,
        transcriber: Option<Arc<dyn Transcriber>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            drawings,
            extractor,
            transcriber,
            config,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/transcribe", post(transcribe))
        .route("/extract-parameters", post(extract_parameters))
        .route("/generate-dwg", post(generate_dwg))
        .route("/download-dwg/{key}", get(download_dwg))
        .route("/files", get(list_files))
        .route("/files/{key}", delete(delete_file))
        .route("/voice-to-dwg", post(voice_to_dwg))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    // Clock steps backwards report zero
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.drawings.stats(),
    })
}

async fn transcribe(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = run_transcription(&state, multipart).await?;
    Ok(Json(TranscriptResponse { transcript }))
}

async fn extract_parameters(
    State(state): State<SharedState>,
    Json(request): Json<TranscriptRequest>,
) -> Result<Json<ParametersResponse>, AppError> {
    if request.transcript.trim().is_empty() {
        return Err(AppError::BadRequest("No transcript provided".into()));
    }

    let parameters = state.extractor.extract(&request.transcript).await;
    Ok(Json(ParametersResponse { parameters }))
}

async fn generate_dwg(
    State(state): State<SharedState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if is_empty_parameters(&request.parameters) {
        return Err(AppError::BadRequest("No parameters provided".into()));
    }

    let drawing = state.drawings.generate(&request.parameters)?;
    Ok(Json(GenerateResponse {
        download_url: download_url(&drawing.key),
        dwg_filename: drawing.key,
        message: "DWG generated successfully".to_string(),
    }))
}

async fn download_dwg(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let (data, metadata) = state
        .drawings
        .get_artifact(&key)
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let content_type = metadata
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!("attachment; filename=\"{}\"", key);

    let mut response = (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response();

    if let Some(etag) = metadata
        .label(LABEL_SHA256)
        .and_then(|sha| HeaderValue::from_str(&format!("\"{}\"", sha)).ok())
    {
        response.headers_mut().insert(header::ETAG, etag);
    }

    Ok(response)
}

async fn list_files(State(state): State<SharedState>) -> Json<FileListResponse> {
    Json(FileListResponse {
        files: state.drawings.list_files(),
    })
}

async fn delete_file(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.drawings.delete_file(&key) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("File not found".into()))
    }
}

/// Audio in, transcript, parameters and a cached drawing out
async fn voice_to_dwg(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<VoiceToPlanResponse>, AppError> {
    let transcript = run_transcription(&state, multipart).await?;
    let parameters = state.extractor.extract(&transcript).await;
    let drawing = state.drawings.generate(&parameters)?;

    Ok(Json(VoiceToPlanResponse {
        transcript,
        parameters,
        download_url: download_url(&drawing.key),
        dwg_path: drawing.key,
    }))
}

async fn run_transcription(
    state: &ServerState,
    multipart: Multipart,
) -> Result<String, AppError> {
    let transcriber = state
        .transcriber
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Speech recognition is not configured".into()))?;

    let (audio, content_type) = read_audio_field(multipart).await?;
    if audio.is_empty() {
        return Err(AppError::BadRequest("No audio provided".into()));
    }

    Ok(transcriber.transcribe(audio, &content_type).await?)
}

/// Bytes and declared content type of the `audio_file` upload
async fn read_audio_field(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid audio upload: {}", e)))?;
        return Ok((data.to_vec(), content_type));
    }

    Err(AppError::BadRequest(format!("Missing form field {}", AUDIO_FIELD)))
}

fn is_empty_parameters(parameters: &Value) -> bool {
    match parameters {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
