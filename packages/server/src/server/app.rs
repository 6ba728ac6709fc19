//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use hostname_extraction::{ExtractionConfig, RecordStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{health_handler, upload_form, upload_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub extraction: Arc<ExtractionConfig>,
    /// Parent directory for staged uploads
    pub temp_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            extraction: Arc::new(config.extraction()),
            temp_dir: config.temp_dir.clone(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState, max_upload_bytes: usize) -> Router {
    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(upload_form))
        .route("/upload", post(upload_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
