use chrono::{DateTime, Utc};

use stockroom_core::{Entity, InvoiceId, UserId};
use stockroom_items::ItemRecord;

/// One row of the `invoices` table.
///
/// `seq` is assigned by storage, strictly increasing in insertion order and
/// never rewritten. `id` is the external identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub seq: i64,
    pub id: InvoiceId,
    pub user_id: UserId,
    pub total: f64,
    pub paid: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_changed_by: String,
    pub last_update: DateTime<Utc>,
}

impl Entity for InvoiceRecord {
    fn seq(&self) -> i64 {
        self.seq
    }
}

/// One row of `invoices LEFT JOIN invoices_items LEFT JOIN items`.
///
/// An invoice with no associations yields exactly one row with `item: None`.
/// An invoice with N associations yields N rows with the same `invoice`
/// block and `item: Some(..)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItemJoinRecord {
    pub invoice: InvoiceRecord,
    pub item: Option<ItemRecord>,
}

impl InvoiceItemJoinRecord {
    pub fn new(invoice: InvoiceRecord, item: Option<ItemRecord>) -> Self {
        Self { invoice, item }
    }
}
