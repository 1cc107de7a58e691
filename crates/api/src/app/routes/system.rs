use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::app::services::AppServices;

/// 200 when the backing store answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Storage reachable"),
        (status = 503, description = "Storage unreachable", body = errors::ErrorBody),
    )
)]
pub async fn health(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stores.health_check().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", e.to_string())
        }
    }
}
