use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{AuditInfo, Entity, PersonId};

/// Storage-shaped person row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub seq: i64,
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_changed_by: String,
    pub last_update: DateTime<Utc>,
}

impl Entity for PersonRecord {
    fn seq(&self) -> i64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Person {
    pub seq: i64,
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub audit_info: AuditInfo,
}

impl From<PersonRecord> for Person {
    fn from(row: PersonRecord) -> Self {
        Self {
            seq: row.seq,
            id: row.id,
            name: row.name,
            email: row.email,
            audit_info: AuditInfo::new(
                row.created_by,
                row.created_at,
                row.last_changed_by,
                row.last_update,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePerson {
    pub name: String,
    pub email: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdatePerson {
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub last_changed_by: String,
}
