use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::BookingStore;

pub fn health_routes(store: Arc<dyn BookingStore>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(store)
}

/// Reports healthy only while the data store answers
pub async fn health_check(State(store): State<Arc<dyn BookingStore>>) -> (StatusCode, Json<Value>) {
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": "gym-booking",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        ),
        Err(err) => {
            tracing::error!(error = ?err, "Health check could not reach the data store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "error": "Data store unreachable",
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })),
            )
        }
    }
}
