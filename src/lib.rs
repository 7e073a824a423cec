//! Machine rental: lookup de una máquina, resolución de su estado de alquiler
//! y workflow de checkout / check-in / mantenimiento contra un backend alojado.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_layer;
use state::AppState;

/// Crear el router de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/machine", routes::machine_routes::create_machine_router())
        .merge(routes::directory_routes::create_directory_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de prueba simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
