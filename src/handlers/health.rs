use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "successcoach-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let storage_ok = state.moods.ping().await.is_ok() && state.goals.ping().await.is_ok();

    if storage_ok {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "storage": "ok" },
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "checks": { "storage": "failed" },
            })),
        )
    }
}
