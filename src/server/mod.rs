//! HTTP upload service.
//!
//! One operation: `POST /api/convert` takes a multipart upload with a `file`
//! field holding a `.md` document and answers with the PDF as a download.
//! `GET /api/health` reports liveness.
//!
//! Each request gets its own temporary directory (prefix `md2pdf-`) holding
//! the upload and the PDF. The directory is removed when the response body
//! is dropped; see [`download::CleanupStream`].
//!
//! ```rust,no_run
//! use md2pdf::server::{self, AppState, ServerConfig};
//! use md2pdf::ConversionConfig;
//!
//! # async fn run() -> Result<(), server::ServerError> {
//! let state = AppState::new(ConversionConfig::default());
//! server::run(state, &ServerConfig::default()).await
//! # }
//! ```

pub mod download;
pub mod error;
pub mod upload;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::ConversionConfig;

pub use download::{CleanupStream, PdfDownload, content_disposition};
pub use error::{ApiError, ErrorBody, ServerError};

/// Default upload limit: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Prefix of every per-request temporary directory.
pub const WORKSPACE_PREFIX: &str = "md2pdf-";

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<ConversionConfig>,
    /// Parent of the per-request directories. None means the system temp dir.
    pub scratch_root: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config: Arc::new(config),
            scratch_root: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Allocate a fresh, uniquely named directory for one request.
    pub fn workspace(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

/// Delete a request directory on the blocking pool and log the outcome.
///
/// Outside a tokio runtime the directory is removed on the calling thread.
pub(crate) fn remove_workspace(workspace: TempDir) {
    let remove = move || {
        let path = workspace.path().to_path_buf();
        match workspace.close() {
            Ok(()) => debug!("Removed request workspace {}", path.display()),
            Err(e) => warn!("Failed to remove request workspace {}: {}", path.display(), e),
        }
    };
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => drop(handle.spawn_blocking(remove)),
        Err(_) => remove(),
    }
}

/// Build the axum router with both endpoints
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/convert", post(upload::convert_upload))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let addr = config.addr();
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(addr) => info!("Starting HTTP server on {}", addr),
        Err(_) => info!("Starting HTTP server"),
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| ServerError::Serve { source })?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
