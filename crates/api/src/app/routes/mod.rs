use axum::Router;

pub mod invoices;
pub mod items;
pub mod persons;
pub mod system;

/// Router for every `/api/v1` endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/persons", persons::router())
        .nest("/items", items::router())
        .nest("/invoices", invoices::router())
}
