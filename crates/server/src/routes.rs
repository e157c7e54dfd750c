use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use ledgerlens_core::ExtractError;
use ledgerlens_extract::{DocumentDecoder, DocumentKind, DocumentPipeline};

use crate::config::ServerConfig;

/// Multipart field carrying the statement file.
pub const UPLOAD_FIELD: &str = "statement";

/// Headroom over `max_upload_bytes` for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub type StatementPipeline = DocumentPipeline<Arc<dyn DocumentDecoder>>;

pub struct AppState {
    pub pipeline: StatementPipeline,
    pub max_upload_bytes: usize,
    pub decode_timeout: Duration,
    pub accept_plain_text: bool,
}

impl AppState {
    pub fn new(pipeline: StatementPipeline, config: &ServerConfig) -> Self {
        Self {
            pipeline,
            max_upload_bytes: config.max_upload_bytes,
            decode_timeout: config.decode_timeout(),
            accept_plain_text: config.accept_plain_text,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route("/api/upload", post(upload_statement))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
enum ApiError {
    NoFile,
    BadMultipart(StatusCode, String),
    TooLarge(usize),
    UnsupportedType,
    Extract(ExtractError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::NoFile => (StatusCode::BAD_REQUEST, "No file uploaded.".to_string(), None),
            ApiError::BadMultipart(status, text) => {
                (status, "Failed to read file data.".to_string(), Some(text))
            }
            ApiError::TooLarge(max) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large. Maximum {} KB.", max / 1024),
                None,
            ),
            ApiError::UnsupportedType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Please upload a valid PDF file.".to_string(),
                None,
            ),
            ApiError::Extract(e @ ExtractError::EmptyInput) => {
                (StatusCode::BAD_REQUEST, e.to_string(), None)
            }
            ApiError::Extract(ExtractError::DecodeFailure(details)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process the PDF statement.".to_string(),
                Some(details),
            ),
        };
        (status, Json(ErrorResponse { message, details })).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────────────────────

async fn upload_statement(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(%request_id, "failed to read multipart body: {e}");
                return Err(ApiError::BadMultipart(e.status(), e.body_text()));
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("statement").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!(%request_id, "failed to read upload bytes: {e}");
            ApiError::BadMultipart(e.status(), e.body_text())
        })?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = upload.ok_or(ApiError::NoFile)?;
    tracing::info!(%request_id, %filename, size = bytes.len(), "received statement upload");

    if bytes.len() > state.max_upload_bytes {
        return Err(ApiError::TooLarge(state.max_upload_bytes));
    }

    match DocumentKind::sniff(&bytes) {
        DocumentKind::Pdf => {}
        DocumentKind::Text if state.accept_plain_text => {}
        _ => return Err(ApiError::UnsupportedType),
    }

    let worker = Arc::clone(&state);
    let task = tokio::task::spawn_blocking(move || worker.pipeline.process_bytes(&bytes));

    let outcome = match tokio::time::timeout(state.decode_timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(ExtractError::DecodeFailure(format!(
            "decoder task failed: {join_err}"
        ))),
        Err(_) => {
            // Blocking tasks cannot be cancelled; the decode keeps its pool
            // thread until the PDF library returns.
            tracing::warn!(%request_id, "decode timed out; worker thread still running");
            Err(ExtractError::DecodeFailure(format!(
                "decoding timed out after {}s",
                state.decode_timeout.as_secs()
            )))
        }
    };

    match outcome {
        Ok(result) => {
            let statement = result.statement;
            tracing::info!(
                %request_id,
                hash = %result.hash_hex,
                bank = %statement.bank_name,
                bank_known = statement.is_bank_known(),
                card = statement.card_last4().unwrap_or("-"),
                transactions = statement.transactions.len(),
                balance_simulated = statement.is_balance_simulated(),
                "parsing complete"
            );
            Ok((StatusCode::OK, Json(statement)).into_response())
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::info!(%request_id, "rejected upload: {e}");
            } else {
                tracing::error!(%request_id, "statement processing failed: {e}");
            }
            Err(ApiError::Extract(e))
        }
    }
}
