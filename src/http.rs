//! HTTP surface: record upload/parse, validation, hierarchy projection,
//! batch saving, and avatar storage.
//!
//! The handlers are thin wrappers: they decode transport concerns (multipart
//! fields, JSON bodies) and relay into the normalize/graph/hierarchy core.
//! Structural anomalies never become HTTP errors; they ride along in the
//! `errors` list of the outcome. Only undecodable input is rejected with 400.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{LineageError, Result};
use crate::hierarchy::{display_value, project_hierarchy};
use crate::ingest::DecoderRegistry;
use crate::normalize::normalize;
use crate::person::Person;
use crate::report::analyze;
use crate::store::Store;

/// HTTP server wrapper
pub struct HttpServer {
    config: Config,
    store: Arc<Store>,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    store: Arc<Store>,
    decoders: Arc<DecoderRegistry>,
}

impl HttpServer {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }

    /// Run the HTTP server until the process is stopped.
    pub async fn run(&self) -> Result<()> {
        let app = self.create_router();
        let addr = self.config.bind_addr();

        log::info!("Starting lineage HTTP server on http://{}", addr);
        log::info!("Upload endpoint: http://{}/parse", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| {
                LineageError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to bind to {}: {}", addr, e),
                ))
            })?;

        axum::serve(listener, app).await.map_err(|e| {
            LineageError::Io(std::io::Error::other(format!("HTTP server error: {}", e)))
        })?;

        Ok(())
    }

    /// Create the axum router
    fn create_router(&self) -> Router {
        let allowed_origins = &self.config.server.allowed_origins;

        // Build CORS layer. No configured origins means any origin is
        // accepted, which is what the upload frontend expects in local use.
        let cors = if allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/parse", post(handle_parse))
            .route("/validate", post(handle_validate))
            .route("/hierarchy", post(handle_hierarchy))
            .route("/save_personas", post(handle_save_personas))
            .route("/upload_avatar/:person_id", post(handle_upload_avatar))
            .route("/health", get(handle_health))
            .nest_service("/uploads", ServeDir::new(self.store.upload_dir()))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(AppState {
                store: Arc::clone(&self.store),
                decoders: Arc::new(DecoderRegistry::new()),
            })
    }
}

/// Map a core error to an HTTP response: a `detail` message with 400 for
/// bad input, 500 for everything else.
fn error_response(err: &LineageError) -> Response {
    let status = match err {
        LineageError::Parse(_)
        | LineageError::UnsupportedFormat(_)
        | LineageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LineageError::Io(_) | LineageError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "detail": err.to_string() }))).into_response()
}

/// Pull the uploaded `file` field (name + content) out of a multipart body.
async fn file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LineageError::InvalidInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| LineageError::InvalidInput(format!("failed to read upload: {}", e)))?;
        return Ok((name, content.to_vec()));
    }
    Err(LineageError::InvalidInput(
        "missing multipart field 'file'".to_string(),
    ))
}

/// POST /parse: decode an uploaded record file, normalize it, and report the
/// canonical persons plus structural diagnostics.
async fn handle_parse(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let (name, content) = match file_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => return error_response(&err),
    };

    match state.decoders.decode(&content, &name) {
        Ok(records) => {
            log::info!("parsed {}: {} record(s)", name, records.len());
            Json(analyze(normalize(&records))).into_response()
        }
        Err(err) => {
            log::warn!("rejected upload {}: {}", name, err);
            error_response(&err)
        }
    }
}

/// POST /validate: re-check an already-normalized person batch.
async fn handle_validate(Json(persons): Json<Vec<Person>>) -> Response {
    Json(analyze(persons)).into_response()
}

/// POST /hierarchy: project a person batch into the display tree.
async fn handle_hierarchy(Json(persons): Json<Vec<Person>>) -> Response {
    let tree = project_hierarchy(&persons);
    Json(display_value(&tree)).into_response()
}

/// POST /save_personas: persist a person batch to the data directory.
async fn handle_save_personas(
    State(state): State<AppState>,
    Json(persons): Json<Vec<Person>>,
) -> Response {
    match state.store.save_persons(&persons) {
        Ok(path) => Json(json!({
            "status": "ok",
            "path": path.display().to_string(),
        }))
        .into_response(),
        Err(err) => {
            log::error!("failed to save persons: {}", err);
            error_response(&err)
        }
    }
}

/// POST /upload_avatar/{person_id}: store an avatar image and return the
/// URL path it is served from.
async fn handle_upload_avatar(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let (name, content) = match file_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => return error_response(&err),
    };

    match state.store.save_avatar(&person_id, &name, &content) {
        Ok(url) => Json(json!({ "url": url })).into_response(),
        Err(err) => {
            log::warn!("rejected avatar for {}: {}", person_id, err);
            error_response(&err)
        }
    }
}

/// GET /health
async fn handle_health() -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}
