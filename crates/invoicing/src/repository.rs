use async_trait::async_trait;

use stockroom_core::{Cursor, InvoiceId, StoreResult, UserId};

use crate::association::SimpleAssociation;
use crate::invoice::{CreateInvoice, UpdateInvoice};
use crate::record::{InvoiceItemJoinRecord, InvoiceRecord};

/// Storage boundary for invoices and the invoice/item link table.
///
/// Implementations must:
/// - return `StoreError::NotFound` when `fetch` or `update` matches zero rows
/// - return every join row for an invoice from `fetch_join_rows`, ordered by
///   association insertion order, with a single `item: None` row when the
///   invoice has no items and an empty vector when the invoice does not exist
/// - report affected-row counts from `delete` and `delete_association`
///   instead of failing on a miss
/// - insert a batch of associations as a single statement
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn fetch(&self, id: InvoiceId) -> StoreResult<InvoiceRecord>;

    async fn fetch_join_rows(&self, id: InvoiceId) -> StoreResult<Vec<InvoiceItemJoinRecord>>;

    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<InvoiceRecord>>;

    async fn fetch_for_user(&self, user_id: UserId) -> StoreResult<Vec<InvoiceRecord>>;

    async fn insert(&self, request: &CreateInvoice) -> StoreResult<InvoiceRecord>;

    async fn update(&self, request: &UpdateInvoice) -> StoreResult<InvoiceRecord>;

    async fn delete(&self, id: InvoiceId) -> StoreResult<u64>;

    async fn insert_associations(&self, pairs: &[SimpleAssociation]) -> StoreResult<u64>;

    async fn delete_association(&self, pair: &SimpleAssociation) -> StoreResult<u64>;
}
