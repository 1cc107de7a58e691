//! Audit metadata carried by every domain object.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Who created/changed a record and when.
///
/// Timestamps are already formatted text (RFC 3339, second precision, `Z`
/// suffix). Formatting happens when a row is mapped into a domain object,
/// never in the row layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditInfo {
    pub created_by: String,
    pub created_at: String,
    pub last_changed_by: String,
    pub last_update: String,
}

impl AuditInfo {
    pub fn new(
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
        last_changed_by: impl Into<String>,
        last_update: DateTime<Utc>,
    ) -> Self {
        Self {
            created_by: created_by.into(),
            created_at: format_timestamp(created_at),
            last_changed_by: last_changed_by.into(),
            last_update: format_timestamp(last_update),
        }
    }
}

/// Canonical textual timestamp format used in every response.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
