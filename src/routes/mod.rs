use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::request_id, state::AppState};

pub mod movies;
pub mod recommend;

/// Creates the application router with all routes
///
/// CORS is wide open: the service fronts a browser client on another origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/movies", get(movies::list))
        .route("/recommend", post(recommend::recommend))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id::request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
