use std::sync::Arc;

use tracing::{debug, info};

use stockroom_core::{Cursor, DeleteResult, InvoiceId, ItemId, StoreError, StoreResult, UserId};

use crate::association::{AddItemsRequest, AssociationManager, AssociationResult};
use crate::invoice::{CreateInvoice, Invoice, UpdateInvoice};
use crate::mapper::{map_collection, map_single, map_with_items};
use crate::repository::InvoiceRepository;

/// Invoice use cases.
///
/// Every read goes back to storage; nothing is cached. Path/body id agreement
/// on updates is the caller's check.
#[derive(Clone)]
pub struct InvoiceService {
    repo: Arc<dyn InvoiceRepository>,
    associations: AssociationManager,
}

impl InvoiceService {
    pub fn new(repo: Arc<dyn InvoiceRepository>) -> Self {
        let associations = AssociationManager::new(Arc::clone(&repo));
        Self { repo, associations }
    }

    /// Fetches one invoice. `with_items` selects the join fetch, otherwise the
    /// single-row fetch is used and `items` is empty.
    pub async fn get_invoice(&self, id: InvoiceId, with_items: bool) -> StoreResult<Invoice> {
        if with_items {
            debug!(invoice_id = %id, "fetching invoice with items");
            let rows = self.repo.fetch_join_rows(id).await?;
            map_with_items(rows).ok_or(StoreError::NotFound)
        } else {
            debug!(invoice_id = %id, "fetching invoice");
            self.repo.fetch(id).await.map(map_single)
        }
    }

    pub async fn get_invoices_for_user(&self, user_id: UserId) -> StoreResult<Vec<Invoice>> {
        let rows = self.repo.fetch_for_user(user_id).await?;
        Ok(map_collection(rows))
    }

    pub async fn get_all_invoices(&self, cursor: Option<Cursor>) -> StoreResult<Vec<Invoice>> {
        let rows = self.repo.fetch_all(cursor).await?;
        Ok(map_collection(rows))
    }

    pub async fn create_invoice(&self, request: CreateInvoice) -> StoreResult<Invoice> {
        let row = self.repo.insert(&request).await?;
        info!(invoice_id = %row.id, user_id = %row.user_id, seq = row.seq, "invoice created");
        Ok(map_single(row))
    }

    pub async fn update_invoice(&self, request: UpdateInvoice) -> StoreResult<Invoice> {
        let row = self.repo.update(&request).await?;
        info!(invoice_id = %row.id, paid = row.paid, "invoice updated");
        Ok(map_single(row))
    }

    pub async fn delete_invoice(&self, id: InvoiceId) -> StoreResult<DeleteResult<InvoiceId>> {
        let affected = self.repo.delete(id).await?;
        let result = DeleteResult::from_affected(id, affected);
        info!(invoice_id = %id, deleted = result.deleted, "invoice delete");
        Ok(result)
    }

    pub async fn add_items_to_invoice(
        &self,
        request: AddItemsRequest,
    ) -> StoreResult<AssociationResult> {
        self.associations.add_items(request).await
    }

    pub async fn remove_item_from_invoice(
        &self,
        invoice_id: InvoiceId,
        item_id: ItemId,
    ) -> StoreResult<AssociationResult> {
        self.associations.remove_item(invoice_id, item_id).await
    }
}
