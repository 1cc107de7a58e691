use serde::{Deserialize, Serialize};

use stockroom_core::{AuditInfo, InvoiceId, UserId};
use stockroom_items::Item;

/// Invoice aggregate as returned to callers.
///
/// Built fresh on every read. `items` is for display only: items are owned
/// independently and linked through the association table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Invoice {
    pub seq: i64,
    pub id: InvoiceId,
    pub user_id: UserId,
    pub total: f64,
    pub paid: bool,
    pub items: Vec<Item>,
    pub audit_info: AuditInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateInvoice {
    pub user_id: UserId,
    pub total: f64,
    pub paid: bool,
    pub created_by: String,
}

/// Overwrites `total`, `paid` and `last_changed_by` of invoice `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateInvoice {
    pub id: InvoiceId,
    pub total: f64,
    pub paid: bool,
    pub last_changed_by: String,
}
