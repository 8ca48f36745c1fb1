//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::warn;

use crate::AppState;

/// Report service health. Returns 503 when the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(db) = &state.db {
        if let Err(e) = db.ping().await {
            warn!(subsystem = "api", error = %e, "Health check: database unreachable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            );
        }
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
