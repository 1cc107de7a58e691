//! OpenAPI description of the HTTP surface and a Redoc page rendering it.

use axum::{Json, response::Html};
use utoipa::OpenApi;

use stockroom_core::{AuditInfo, InvoiceId, ItemId, PersonId, UserId};
use stockroom_invoicing::{
    AddItemsRequest, AssociationResult, CreateInvoice, Invoice, UpdateInvoice,
};
use stockroom_items::{CreateItem, Item, UpdateItem};
use stockroom_persons::{CreatePerson, Person, UpdatePerson};

use crate::app::dto::DeleteResponse;
use crate::app::errors::ErrorBody;
use crate::app::routes;

pub const OPENAPI_PATH: &str = "/docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Service API",
        version = "1.0",
        description = "Persons, items and invoices with their item associations."
    ),
    paths(
        routes::system::health,
        routes::persons::list_persons,
        routes::persons::get_person,
        routes::persons::create_person,
        routes::persons::update_person,
        routes::persons::delete_person,
        routes::items::list_items,
        routes::items::get_item,
        routes::items::create_item,
        routes::items::update_item,
        routes::items::delete_item,
        routes::invoices::list_invoices,
        routes::invoices::list_invoices_for_user,
        routes::invoices::get_invoice,
        routes::invoices::create_invoice,
        routes::invoices::update_invoice,
        routes::invoices::delete_invoice,
        routes::invoices::add_items,
        routes::invoices::remove_item,
    ),
    components(schemas(
        PersonId,
        ItemId,
        InvoiceId,
        UserId,
        AuditInfo,
        Person,
        CreatePerson,
        UpdatePerson,
        Item,
        CreateItem,
        UpdateItem,
        Invoice,
        CreateInvoice,
        UpdateInvoice,
        AddItemsRequest,
        AssociationResult,
        DeleteResponse,
        ErrorBody,
    )),
    tags(
        (name = "system", description = "Liveness"),
        (name = "persons", description = "People owning invoices"),
        (name = "items", description = "Catalogue items"),
        (name = "invoices", description = "Invoices and their item associations"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn redoc() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Inventory Service API</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
    <redoc spec-url="{OPENAPI_PATH}"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
</body>
</html>
"#
    ))
}
