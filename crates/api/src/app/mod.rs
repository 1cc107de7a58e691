//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the services and the stores they share
//! - `routes/`: HTTP routes + handlers (one file per entity)
//! - `dto.rs`: query-string and response DTOs
//! - `docs.rs`: OpenAPI document and Redoc page
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use stockroom_infra::Stores;

pub mod docs;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(stores: Stores) -> Router {
    let services = Arc::new(AppServices::from_stores(stores));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/docs", get(docs::redoc))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .nest("/api/v1", routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
