//! SrcVeil Server
//!
//! HTTP boundary for the obfuscation pipeline: accepts source submissions,
//! runs the transform passes, and serves the produced artifacts. The
//! credential store does not gate these endpoints; it only governs
//! client-side navigation.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use srcveil_core::{JobError, JobReport, JobStore, ObfuscateOptions};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Root directory for per-job artifacts
    pub jobs_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            host: "127.0.0.1".to_string(),
            jobs_dir: PathBuf::from("jobs"),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Per-job artifact store
    pub jobs: JobStore,

    /// Base URL advertised in download links
    pub base_url: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            jobs: JobStore::new(config.jobs_dir.clone()),
            base_url: format!("http://{}:{}", config.host, config.port),
        })
    }
}

/// Obfuscation request body
#[derive(Debug, Deserialize)]
pub struct ObfuscateRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub options: ObfuscateOptions,
}

/// Obfuscation response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscateResponse {
    pub job_id: String,
    pub report: JobReport,
    pub download_url: String,
}

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/obfuscate", post(handle_obfuscate))
        .route("/download/:job_id", get(handle_download))
        .route("/health", get(handle_health))
        .with_state(state)
        // Allow large source submissions (10MB limit)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Accept a source submission and run the pipeline synchronously
async fn handle_obfuscate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ObfuscateRequest>,
) -> impl IntoResponse {
    match state.jobs.run(&req.code, &req.options) {
        Ok(completed) => {
            let job_id = completed.job.id().to_string();
            tracing::info!("Obfuscated job {} ({} pass(es))", job_id, completed.report.passes.len());
            let download_url = format!("{}/download/{}", state.base_url, job_id);
            (
                StatusCode::OK,
                Json(serde_json::to_value(ObfuscateResponse {
                    job_id,
                    report: completed.report,
                    download_url,
                })
                .unwrap()),
            )
        }
        Err(JobError::EmptySource) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "No code provided"})),
        ),
        Err(e) => {
            tracing::error!("Obfuscate error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}

/// Serve a job's transformed output as a file download
async fn handle_download(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let path = match state.jobs.output_path(&job_id) {
        Ok(path) => path,
        Err(JobError::UnknownJob(_)) => {
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
        Err(e) => {
            tracing::error!("Download error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(contents) => {
            let filename = JobStore::download_name(&job_id);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                contents,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Download error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

/// Start the server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config);
    let router = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("SrcVeil server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
