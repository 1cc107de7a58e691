use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{AuditInfo, Entity, ItemId};

/// Storage-shaped item row (one row of the `items` table).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub seq: i64,
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_changed_by: String,
    pub last_update: DateTime<Utc>,
}

impl Entity for ItemRecord {
    fn seq(&self) -> i64 {
        self.seq
    }
}

/// Domain item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Item {
    pub seq: i64,
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub audit_info: AuditInfo,
}

impl From<ItemRecord> for Item {
    fn from(row: ItemRecord) -> Self {
        Self {
            seq: row.seq,
            id: row.id,
            name: row.name,
            description: row.description,
            unit_price: row.unit_price,
            audit_info: AuditInfo::new(
                row.created_by,
                row.created_at,
                row.last_changed_by,
                row.last_update,
            ),
        }
    }
}

/// Command: create an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub created_by: String,
}

/// Command: overwrite an item's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub last_changed_by: String,
}
