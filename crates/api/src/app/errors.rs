use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use stockroom_core::{DomainError, StoreError};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `not_found`.
    pub error: String,
    pub message: String,
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Constraint(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "constraint_violation", msg)
        }
        StoreError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
        StoreError::Query(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    let body = ErrorBody {
        error: code.to_string(),
        message: message.into(),
    };
    (status, axum::Json(body)).into_response()
}

/// Parses a path identifier, mapping failure to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(domain_error_to_response)
}

/// Rejects a body whose id disagrees with the path id.
pub fn ensure_same_id<T: PartialEq + std::fmt::Display>(
    path_id: T,
    body_id: T,
) -> Result<(), axum::response::Response> {
    if path_id == body_id {
        Ok(())
    } else {
        Err(domain_error_to_response(DomainError::validation(format!(
            "path id {path_id} does not match body id {body_id}"
        ))))
    }
}
