use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::api::{self, AppState};
use crate::config::AppConfig;
use crate::gallery::PUBLIC_URL_PREFIX;
use crate::web_pages;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(config: AppConfig) -> Router {
    let body_limit = config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let state = Arc::new(AppState::new(config));
    let uploads = ServeDir::new(state.storage.base_dir());

    Router::new()
        .route("/", get(web_pages::index_page))
        .route("/dashboard", get(web_pages::dashboard_page))
        .route(
            "/api/upload",
            post(api::upload_photo).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/images", get(api::list_images))
        .route("/api/health", get(api::health))
        .nest_service(PUBLIC_URL_PREFIX, uploads)
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
