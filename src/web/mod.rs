//! The HTTP front end: upload an export, get the processed CSV back.

mod error;
mod handlers;

use crate::Config;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Shared, read-only state of the web service.
pub type AppState = Arc<Config>;

/// Where `GET /` sends the browser.
pub const LANDING_PAGE: &str = "/static/index.html";

/// Builds the application router for `config`.
pub fn router(config: Config) -> Router {
    let static_files = ServeDir::new(config.static_dir());
    let body_limit = config.max_upload_bytes();
    let state: AppState = Arc::new(config);

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/download/{filename}", get(handlers::download))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
