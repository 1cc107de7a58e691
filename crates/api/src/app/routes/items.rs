use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_core::ItemId;
use stockroom_items::{CreateItem, UpdateItem};

use crate::app::dto::{DeleteResponse, PageQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    params(
        ("last_id" = Option<String>, Query, description = "Last sequence id already seen"),
        ("page_size" = Option<String>, Query, description = "Maximum rows per page, default 10"),
    ),
    responses(
        (status = 200, description = "Page of items", body = [stockroom_items::Item]),
    )
)]
pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(page): Query<PageQuery>,
) -> axum::response::Response {
    match services.items.get_all(page.cursor()).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = stockroom_items::Item),
        (status = 404, description = "No such item", body = errors::ErrorBody),
    )
)]
pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.get(id).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Created item", body = stockroom_items::Item),
    )
)]
pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateItem>,
) -> axum::response::Response {
    match services.items.create(body).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id, must match the body id")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Updated item", body = stockroom_items::Item),
        (status = 400, description = "Path and body ids differ", body = errors::ErrorBody),
        (status = 404, description = "No such item", body = errors::ErrorBody),
    )
)]
pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateItem>,
) -> axum::response::Response {
    let id: ItemId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = errors::ensure_same_id(id, body.id) {
        return resp;
    }

    match services.items.update(body).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Whether a row was removed", body = DeleteResponse),
    )
)]
pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.delete(id).await {
        Ok(result) => Json(DeleteResponse::from(result)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
