// ============================================================================
// Governo API - Governo Item Handlers
// File: crates/governo-api/src/handlers/governo.rs
// ============================================================================
//! Public and administrative menu listings

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use governo_core::cache::{QueryKey, QueryStatus};
use governo_core::domain::GovernoItem;

use crate::response::{domain_failure, ApiFailure, ApiResponse};
use crate::state::AppState;

/// Menu entry DTO for responses
#[derive(Debug, Serialize)]
pub struct GovernoItemDto {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub order: i32,
    pub active: bool,
    pub href: String,
}

impl From<GovernoItem> for GovernoItemDto {
    fn from(item: GovernoItem) -> Self {
        let href = item.href();
        Self {
            id: item.id,
            title: item.title,
            slug: item.slug,
            order: item.order,
            active: item.active,
            href,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub public: &'static str,
    pub admin: &'static str,
    /// Origin of the cached public listing, if one is cached
    pub public_source: Option<&'static str>,
    /// The cached public listing is the fallback served after a backend error
    pub public_degraded: bool,
}

fn status_name(status: QueryStatus) -> &'static str {
    match status {
        QueryStatus::Idle => "idle",
        QueryStatus::Pending => "pending",
        QueryStatus::Success => "success",
        QueryStatus::Stale => "stale",
        QueryStatus::Error => "error",
    }
}

fn to_dtos(items: Vec<GovernoItem>) -> Vec<GovernoItemDto> {
    items.into_iter().map(GovernoItemDto::from).collect()
}

/// Public listing - GET /api/v1/governo-itens
pub async fn list_public(State(state): State<AppState>) -> Json<ApiResponse<Vec<GovernoItemDto>>> {
    let items = state.items.public_items().await;
    Json(ApiResponse::success(to_dtos(items)))
}

/// Admin listing - GET /api/v1/admin/governo-itens
pub async fn list_admin(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GovernoItemDto>>>, ApiFailure> {
    let items = state.items.admin_items().await.map_err(|e| domain_failure(&e))?;
    Ok(Json(ApiResponse::success(to_dtos(items))))
}

/// Forced admin reload - POST /api/v1/admin/governo-itens/refresh
pub async fn refresh_admin(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GovernoItemDto>>>, ApiFailure> {
    info!("Refreshing admin governo items");
    let items = state.items.refetch_admin().await.map_err(|e| domain_failure(&e))?;
    Ok(Json(ApiResponse::success(to_dtos(items))))
}

/// Drop both listings - POST /api/v1/admin/governo-itens/invalidate
pub async fn invalidate(State(state): State<AppState>) -> Json<ApiResponse<CacheStatusResponse>> {
    info!("Invalidating governo item queries");
    state.items.invalidate_all();
    Json(ApiResponse::success(cache_status_of(&state)))
}

/// Cache lifecycle - GET /api/v1/admin/governo-itens/status
pub async fn cache_status(State(state): State<AppState>) -> Json<ApiResponse<CacheStatusResponse>> {
    Json(ApiResponse::success(cache_status_of(&state)))
}

fn cache_status_of(state: &AppState) -> CacheStatusResponse {
    let listing = state.items.peek_public();
    CacheStatusResponse {
        public: status_name(state.items.status(&QueryKey::PUBLIC_ITEMS)),
        admin: status_name(state.items.status(&QueryKey::ADMIN_ITEMS)),
        public_source: listing.as_ref().map(|l| l.source.as_str()),
        public_degraded: listing.as_ref().is_some_and(|l| l.is_degraded()),
    }
}
