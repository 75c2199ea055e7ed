use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "contractiq-api"
    }))
}

/// GET /
/// Service banner, including which provider and model back the analysis.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Contract Analysis API",
        "status": "running",
        "ai_provider": state.config.llm_provider,
        "ai_model": state.config.llm_model,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
