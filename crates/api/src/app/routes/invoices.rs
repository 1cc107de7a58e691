use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use stockroom_core::{InvoiceId, ItemId, UserId};
use stockroom_invoicing::{AddItemsRequest, CreateInvoice, UpdateInvoice};

use crate::app::dto::{DeleteResponse, InvoiceQuery, PageQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/user/:user_id", get(list_invoices_for_user))
        .route("/:id", get(get_invoice).put(update_invoice).delete(delete_invoice))
        .route("/:id/items", post(add_items))
        .route("/:id/items/:item_id", delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "invoices",
    params(
        ("last_id" = Option<String>, Query, description = "Last sequence id already seen"),
        ("page_size" = Option<String>, Query, description = "Maximum rows per page, default 10"),
    ),
    responses(
        (
            status = 200,
            description = "Page of invoices, items not loaded",
            body = [stockroom_invoicing::Invoice]
        ),
    )
)]
pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Query(page): Query<PageQuery>,
) -> axum::response::Response {
    match services.invoices.get_all_invoices(page.cursor()).await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/user/{user_id}",
    tag = "invoices",
    params(("user_id" = String, Path, description = "Owning person id")),
    responses(
        (
            status = 200,
            description = "Every invoice of the user",
            body = [stockroom_invoicing::Invoice]
        ),
    )
)]
pub async fn list_invoices_for_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match errors::parse_id(&user_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.invoices.get_invoices_for_user(user_id).await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    tag = "invoices",
    params(
        ("id" = String, Path, description = "Invoice id"),
        ("withItems" = Option<String>, Query, description = "`true` loads associated items"),
    ),
    responses(
        (status = 200, description = "The invoice", body = stockroom_invoicing::Invoice),
        (status = 404, description = "No such invoice", body = errors::ErrorBody),
    )
)]
pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> axum::response::Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.invoices.get_invoice(id, query.with_items()).await {
        Ok(invoice) => Json(invoice).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "invoices",
    request_body = CreateInvoice,
    responses(
        (
            status = 201,
            description = "Created invoice with no items",
            body = stockroom_invoicing::Invoice
        ),
        (status = 422, description = "Unknown user", body = errors::ErrorBody),
    )
)]
pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateInvoice>,
) -> axum::response::Response {
    match services.invoices.create_invoice(body).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id, must match the body id")),
    request_body = UpdateInvoice,
    responses(
        (status = 200, description = "Updated invoice", body = stockroom_invoicing::Invoice),
        (status = 400, description = "Path and body ids differ", body = errors::ErrorBody),
        (status = 404, description = "No such invoice", body = errors::ErrorBody),
    )
)]
pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateInvoice>,
) -> axum::response::Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = errors::ensure_same_id(id, body.id) {
        return resp;
    }

    match services.invoices.update_invoice(body).await {
        Ok(invoice) => Json(invoice).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Whether a row was removed", body = DeleteResponse),
    )
)]
pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.invoices.delete_invoice(id).await {
        Ok(result) => Json(DeleteResponse::from(result)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/items",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    request_body = AddItemsRequest,
    responses(
        (
            status = 200,
            description = "Items attached",
            body = stockroom_invoicing::AssociationResult
        ),
        (status = 400, description = "Id mismatch or empty list", body = errors::ErrorBody),
        (status = 409, description = "Item already attached", body = errors::ErrorBody),
        (status = 422, description = "Unknown invoice or item", body = errors::ErrorBody),
    )
)]
pub async fn add_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AddItemsRequest>,
) -> axum::response::Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = errors::ensure_same_id(id, body.invoice_id) {
        return resp;
    }
    if body.items.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "items must not be empty",
        );
    }

    match services.invoices.add_items_to_invoice(body).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}/items/{item_id}",
    tag = "invoices",
    params(
        ("id" = String, Path, description = "Invoice id"),
        ("item_id" = String, Path, description = "Item id"),
    ),
    responses(
        (
            status = 200,
            description = "`success` is false when the pair was absent",
            body = stockroom_invoicing::AssociationResult
        ),
    )
)]
pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id: ItemId = match errors::parse_id(&item_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.invoices.remove_item_from_invoice(id, item_id).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
