use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_core::PersonId;
use stockroom_persons::{CreatePerson, UpdatePerson};

use crate::app::dto::{DeleteResponse, PageQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route("/:id", get(get_person).put(update_person).delete(delete_person))
}

#[utoipa::path(
    get,
    path = "/api/v1/persons",
    tag = "persons",
    params(
        ("last_id" = Option<String>, Query, description = "Last sequence id already seen"),
        ("page_size" = Option<String>, Query, description = "Maximum rows per page, default 10"),
    ),
    responses(
        (status = 200, description = "Page of persons", body = [stockroom_persons::Person]),
    )
)]
pub async fn list_persons(
    Extension(services): Extension<Arc<AppServices>>,
    Query(page): Query<PageQuery>,
) -> axum::response::Response {
    match services.persons.get_all(page.cursor()).await {
        Ok(persons) => Json(persons).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/persons/{id}",
    tag = "persons",
    params(("id" = String, Path, description = "Person id")),
    responses(
        (status = 200, description = "The person", body = stockroom_persons::Person),
        (status = 404, description = "No such person", body = errors::ErrorBody),
    )
)]
pub async fn get_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PersonId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.persons.get(id).await {
        Ok(person) => Json(person).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/persons",
    tag = "persons",
    request_body = CreatePerson,
    responses(
        (status = 201, description = "Created person", body = stockroom_persons::Person),
    )
)]
pub async fn create_person(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreatePerson>,
) -> axum::response::Response {
    match services.persons.create(body).await {
        Ok(person) => (StatusCode::CREATED, Json(person)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/persons/{id}",
    tag = "persons",
    params(("id" = String, Path, description = "Person id, must match the body id")),
    request_body = UpdatePerson,
    responses(
        (status = 200, description = "Updated person", body = stockroom_persons::Person),
        (status = 400, description = "Path and body ids differ", body = errors::ErrorBody),
        (status = 404, description = "No such person", body = errors::ErrorBody),
    )
)]
pub async fn update_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePerson>,
) -> axum::response::Response {
    let id: PersonId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = errors::ensure_same_id(id, body.id) {
        return resp;
    }

    match services.persons.update(body).await {
        Ok(person) => Json(person).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/persons/{id}",
    tag = "persons",
    params(("id" = String, Path, description = "Person id")),
    responses(
        (status = 200, description = "Whether a row was removed", body = DeleteResponse),
    )
)]
pub async fn delete_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PersonId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.persons.delete(id).await {
        Ok(result) => Json(DeleteResponse::from(result)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
