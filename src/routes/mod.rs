//! Router assembly for both deployment shapes: hint endpoint, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod static_files;

pub const HINT_PATH: &str = "/api/ai-hint";
pub const HEALTH_PATH: &str = "/api/health";

/// Local development server:
/// - `POST /api/ai-hint` hint pipeline
/// - `GET /api/health`
/// - everything else served from the static root
/// - wildcard CORS; `CorsLayer` answers `OPTIONS` on any path with an empty 200
pub fn build_local_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route(HINT_PATH, post(http::http_post_hint).fallback(static_files::serve_static))
        .route(HEALTH_PATH, get(http::http_health))
        .fallback(static_files::serve_static)
        .with_state(state);

    finish(app, cors)
}

/// Hosted handler: only the hint endpoint (plus health), CORS pinned to one origin,
/// and a JSON 405 for any other method on the hint path.
pub fn build_handler_router(
    state: Arc<AppState>,
    allowed_origin: &str,
) -> Result<Router, axum::http::header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(allowed_origin)?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route(HINT_PATH, post(http::http_post_hint).fallback(http::method_not_allowed))
        .route(HEALTH_PATH, get(http::http_health))
        .with_state(state);

    Ok(finish(app, cors))
}

fn finish(app: Router, cors: CorsLayer) -> Router {
    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
