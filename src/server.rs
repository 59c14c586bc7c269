//! HTTP API for the assistant backend.
//!
//! Exposes indexing, question answering, and inline editing as a JSON API
//! for the editor shell.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/index_project` | Index a project directory into the corpus |
//! | `POST` | `/ask` | Answer a question with retrieved project context |
//! | `POST` | `/edit_inline` | Rewrite a code selection per an instruction |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Client and internal failures use the error schema:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid path: ..." } }
//! ```
//!
//! Generation-model failures are deliberately *not* HTTP errors: `/ask`
//! folds the failure text into its normal `response` payload and
//! `/edit_inline` returns the selection unchanged plus an `error` field,
//! so a flaky local model never breaks the editor integration.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted — the client is a
//! desktop/editor shell, not a single known web origin.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::corpus::SharedCorpus;
use crate::error::IndexError;
use crate::models::SkippedFile;
use crate::{generation, indexer, prompt, retriever};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    corpus: SharedCorpus,
}

/// Start the HTTP server on the configured bind address.
///
/// The corpus handle is created by the caller (empty at process start) and
/// shared between the indexing and query handlers. Runs until the process
/// is terminated.
pub async fn run_server(config: &Config, corpus: SharedCorpus) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        corpus,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/index_project", post(handle_index_project))
        .route("/ask", post(handle_ask))
        .route("/edit_inline", post(handle_edit_inline))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    info!(bind = %bind_addr, "listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 Internal Server Error.
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps indexing errors to HTTP responses: a bad path is the caller's
/// mistake, everything else is ours.
fn classify_index_error(err: IndexError) -> AppError {
    match err {
        IndexError::InvalidPath(_) => bad_request(err.to_string()),
        other => internal(other.to_string()),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /index_project ============

#[derive(Deserialize)]
struct IndexProjectRequest {
    path: PathBuf,
}

#[derive(Serialize)]
struct IndexProjectResponse {
    status: String,
    files_indexed: usize,
    chunks_indexed: usize,
    skipped: Vec<SkippedFile>,
}

/// Handler for `POST /index_project`.
///
/// Rebuilds the corpus from the given directory. The previous corpus stays
/// published (and searchable) until the replacement is complete.
async fn handle_index_project(
    State(state): State<AppState>,
    Json(req): Json<IndexProjectRequest>,
) -> Result<Json<IndexProjectResponse>, AppError> {
    let report = indexer::index_project(&req.path, &state.config, &state.corpus)
        .await
        .map_err(classify_index_error)?;

    Ok(Json(IndexProjectResponse {
        status: "success".to_string(),
        files_indexed: report.files_indexed,
        chunks_indexed: report.chunks_indexed,
        skipped: report.skipped,
    }))
}

// ============ POST /ask ============

#[derive(Deserialize)]
struct AskRequest {
    prompt: String,
    /// The user's current editor buffer, if any.
    #[serde(default)]
    context_code: String,
}

#[derive(Serialize)]
struct AskResponse {
    response: String,
}

/// Handler for `POST /ask`.
///
/// Retrieves the nearest chunks for the question, composes the full prompt,
/// and asks the generation model. A model failure is folded into the
/// response text rather than surfaced as an HTTP error.
async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let retrieved = retriever::retrieve(
        &req.prompt,
        state.config.retrieval.top_k,
        &state.config,
        &state.corpus,
    )
    .await
    .map_err(|e| internal(e.to_string()))?;

    let full_prompt = prompt::compose_query_prompt(&retrieved, &req.context_code, &req.prompt);

    let response = match generation::generate(&state.config.generation, &full_prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "generation failed; answering with the failure text");
            format!("Ollama error: {e}. Make sure Ollama is running.")
        }
    };

    Ok(Json(AskResponse { response }))
}

// ============ POST /edit_inline ============

#[derive(Deserialize)]
struct EditRequest {
    instruction: String,
    selected_code: String,
    file_context: String,
}

#[derive(Serialize)]
struct EditResponse {
    modified_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Handler for `POST /edit_inline`.
///
/// Asks the model to rewrite the selection and strips any markdown fences
/// it wrapped around the result. On model failure the selection is
/// returned unchanged with the failure in `error` — never an error string
/// where the editor expects code.
async fn handle_edit_inline(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let edit_prompt =
        prompt::compose_edit_prompt(&req.instruction, &req.selected_code, &req.file_context);

    match generation::generate(&state.config.generation, &edit_prompt).await {
        Ok(text) => Ok(Json(EditResponse {
            modified_code: generation::strip_code_fences(&text),
            error: None,
        })),
        Err(e) => {
            error!(error = %e, "generation failed; returning selection unchanged");
            Ok(Json(EditResponse {
                modified_code: req.selected_code,
                error: Some(e.to_string()),
            }))
        }
    }
}
