//! Local HTTP surface used by the desktop shell.
//!
//! `GET /health` answers `{"status":"alive"}`; `POST /process-file` runs change
//! detection on `{"file_path": ...}`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::commands::{process_file, CommandError, CommandErrorKind, ProcessRequest, ProcessResponse};
use crate::config::Config;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl From<CommandError> for ApiError {
    fn from(e: CommandError) -> Self {
        match e.kind {
            CommandErrorKind::NotFound => ApiError::NotFound(e.message),
            CommandErrorKind::Internal => ApiError::Internal(e.message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) | ApiError::Config(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Http(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };
        error!("request error: {}", message);
        (status, Json(serde_json::json!({ "detail": message }))).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn router(config: Config) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/process-file", post(process))
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Bind `config.bind_addr` and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<(), ApiError> {
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|err| ApiError::Config(format!("Invalid bind addr: {err}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Http(format!("Bind error: {err}")))?;
    info!("groobi listening on {addr}");

    axum::serve(listener, router(config))
        .await
        .map_err(|err| ApiError::Http(format!("Server error: {err}")))?;

    Ok(())
}

/// Ask a running server whether it is alive.
pub async fn probe_health(base_url: &str) -> Result<HealthResponse, ApiError> {
    let client = reqwest::Client::builder().timeout(HEALTH_TIMEOUT).build()?;
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let response = client.get(&url).send().await?.error_for_status()?;
    Ok(response.json().await?)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
    })
}

async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let response = process_file(request, state.config.as_ref().clone()).await?;
    info!(
        "Processed {}: {} ({} rows)",
        response.processed_file, response.outcome, response.changed_rows
    );
    Ok(Json(response))
}
