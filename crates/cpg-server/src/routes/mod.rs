//! HTTP routes
//!
//! - `GET /health`
//! - `GET /api/v1/dashboard` - everything the page renders in one payload
//! - `GET /api/v1/summary`
//! - `GET /api/v1/charts/:name`
//! - `GET /api/v1/records?page=&per_page=`
//! - `GET /api/v1/recommendations`

pub mod charts;
pub mod dashboard;
pub mod records;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use crate::config::CorsConfig;
use crate::middleware;
use crate::state::SharedState;

/// Build the application router with all routes and middleware
pub fn router(state: SharedState, cors: &CorsConfig) -> Router {
    let api_v1 = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/summary", get(dashboard::get_summary))
        .route("/recommendations", get(dashboard::get_recommendations))
        .route("/charts/:name", get(charts::get_chart))
        .route("/records", get(records::list_records));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .with_state(state)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// Health check handler
async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "records": state.dataset.records.len(),
    }))
}
