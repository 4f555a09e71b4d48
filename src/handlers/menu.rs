use crate::models::{MenuStructure, NavItem};
use crate::services::MenuService;
use crate::utils::error::ApiError;
use crate::utils::sanitize_error;
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

/// Main navigation tree for the rendering layer. Never fails: the
/// service falls back to the static menu on any database error.
pub async fn main_nav_handler(
    Extension(menu_service): Extension<Arc<MenuService>>,
) -> Json<Vec<NavItem>> {
    Json(menu_service.main_nav_items().await)
}

/// Raw composite structure, for inspection and build tooling.
pub async fn menu_structure_handler(
    Extension(menu_service): Extension<Arc<MenuService>>,
) -> Result<Json<MenuStructure>, ApiError> {
    let structure = menu_service
        .build_menu_structure()
        .await
        .map_err(|e| ApiError::DatabaseError(sanitize_error(&e)))?;

    Ok(Json(structure))
}

/// Manual cache invalidation hook for test harnesses and operators.
pub async fn clear_cache_handler(
    Extension(menu_service): Extension<Arc<MenuService>>,
) -> StatusCode {
    menu_service.clear_cache();
    info!("Menu cache cleared");
    StatusCode::NO_CONTENT
}
