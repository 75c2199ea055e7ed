pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::contracts::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Contracts API
        .route(
            "/api/v1/contracts",
            post(handlers::handle_upload).get(handlers::handle_list_contracts),
        )
        .route(
            "/api/v1/contracts/stats",
            get(handlers::handle_contract_stats),
        )
        .route("/api/v1/contracts/:id", get(handlers::handle_get_contract))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
