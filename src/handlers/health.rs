use crate::database::DbPool;
use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Ready only when the database answers. The nav endpoint itself stays
/// available regardless, via the fallback menu.
pub async fn readiness_check(Extension(pool): Extension<DbPool>) -> StatusCode {
    match pool.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!(
                "Readiness check failed: {}",
                crate::utils::sanitize_error(&err)
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
