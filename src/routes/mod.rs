pub mod page_routes;
pub mod vehicle_routes;

use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Crear la aplicación completa: páginas, API y middlewares
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .merge(page_routes::create_page_router())
        .nest("/api", vehicle_routes::create_vehicle_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_middleware())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Endpoint de salud simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "taller-patentes",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
