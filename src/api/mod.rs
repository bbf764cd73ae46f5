//! REST API module using Axum
//!
//! Serves the dashboard's JSON API under `/api/v1` with a uniform
//! `{data, meta}` / `{error, meta}` envelope, plus a root `/health` probe.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Comma-separated list of origins allowed to call the API cross-origin.
pub const CORS_ORIGINS_ENV: &str = "PRINTWATCH_CORS_ORIGINS";

async fn fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        "printwatch is running. API endpoints are under /api/v1.",
    )
        .into_response()
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `PRINTWATCH_CORS_ORIGINS` for a dashboard served from another origin
/// (e.g. `http://localhost:3000` during frontend development).
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match std::env::var(CORS_ORIGINS_ENV) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::legacy_routes(state))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer())
}
