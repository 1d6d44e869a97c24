use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{governo, health, time_label};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Public routes
        .route("/api/v1/governo-itens", get(governo::list_public))
        .route("/api/v1/time-label", get(time_label::render))
        // Admin routes
        .route("/api/v1/admin/governo-itens", get(governo::list_admin))
        .route("/api/v1/admin/governo-itens/status", get(governo::cache_status))
        .route("/api/v1/admin/governo-itens/refresh", post(governo::refresh_admin))
        .route("/api/v1/admin/governo-itens/invalidate", post(governo::invalidate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
