//! Route definitions and router construction.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Conversation routes, without state applied.
fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    let analyze = post(handlers::vision::analyze_image)
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/prompt", post(handlers::chat::prompt))
        .route("/continue", get(handlers::chat::continue_reply))
        .route("/analyze-image", analyze.clone())
        .route("/analyze-image/", analyze)
        .route("/history", get(handlers::history::get_history))
}

fn with_layers(router: Router, cors_config: &CorsConfig) -> Router {
    router
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Create the API-only router.
///
/// `/` answers with a JSON service description.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let max_upload_bytes = ctx.max_upload_bytes;
    let state: AppState = Arc::new(ctx);

    let router = api_routes(max_upload_bytes)
        .route("/", get(handlers::system::service_info))
        .route("/health", get(health_check))
        .with_state(state);
    with_layers(router, cors_config)
}

/// Create a router that also serves static assets.
///
/// API routes take priority. Any other path is served from `static_dir`,
/// falling back to `index.html`, so `/` is the landing page.
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(static_path.join("index.html")));

    let max_upload_bytes = ctx.max_upload_bytes;
    let state: AppState = Arc::new(ctx);

    let router = api_routes(max_upload_bytes)
        .route("/health", get(health_check))
        .with_state(state)
        .fallback_service(serve_dir);
    with_layers(router, cors_config)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
