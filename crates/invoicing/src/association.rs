//! Invoice/item many-to-many link management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use stockroom_core::{InvoiceId, ItemId, StoreResult};

use crate::repository::InvoiceRepository;

/// One `(invoice_id, item_id)` row of the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleAssociation {
    pub invoice_id: InvoiceId,
    pub item_id: ItemId,
}

impl SimpleAssociation {
    pub fn new(invoice_id: InvoiceId, item_id: ItemId) -> Self {
        Self { invoice_id, item_id }
    }
}

/// Request body for attaching items to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddItemsRequest {
    pub invoice_id: InvoiceId,
    pub items: Vec<ItemId>,
}

impl AddItemsRequest {
    pub fn to_associations(&self) -> Vec<SimpleAssociation> {
        self.items
            .iter()
            .map(|item_id| SimpleAssociation::new(self.invoice_id, *item_id))
            .collect()
    }
}

/// Outcome of an association mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AssociationResult {
    pub invoice_id: InvoiceId,
    pub items: Vec<ItemId>,
    pub success: bool,
}

/// Adds and removes link rows.
///
/// Concurrent mutations on the same invoice are not serialised here; the
/// storage unique constraint on `(invoice_id, item_id)` rejects duplicates.
#[derive(Clone)]
pub struct AssociationManager {
    repo: Arc<dyn InvoiceRepository>,
}

impl AssociationManager {
    pub fn new(repo: Arc<dyn InvoiceRepository>) -> Self {
        Self { repo }
    }

    /// Inserts every `(invoice_id, item)` pair in one batch.
    ///
    /// Storage failures are returned as errors, never as `success: false`.
    /// An empty item list touches nothing and reports `success: false`.
    pub async fn add_items(&self, request: AddItemsRequest) -> StoreResult<AssociationResult> {
        let pairs = request.to_associations();
        if pairs.is_empty() {
            return Ok(AssociationResult {
                invoice_id: request.invoice_id,
                items: request.items,
                success: false,
            });
        }

        let inserted = self.repo.insert_associations(&pairs).await?;
        info!(
            invoice_id = %request.invoice_id,
            requested = pairs.len(),
            inserted,
            "items associated"
        );

        Ok(AssociationResult {
            invoice_id: request.invoice_id,
            items: request.items,
            success: true,
        })
    }

    /// Deletes one pair. Removing a pair that does not exist reports
    /// `success: false` and is not an error.
    pub async fn remove_item(
        &self,
        invoice_id: InvoiceId,
        item_id: ItemId,
    ) -> StoreResult<AssociationResult> {
        let pair = SimpleAssociation::new(invoice_id, item_id);
        let affected = self.repo.delete_association(&pair).await?;
        info!(%invoice_id, %item_id, affected, "item association removed");

        Ok(AssociationResult {
            invoice_id,
            items: vec![item_id],
            success: affected > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_associations_pairs_every_item_with_the_invoice() {
        let invoice_id = InvoiceId::new();
        let items = vec![ItemId::new(), ItemId::new(), ItemId::new()];
        let request = AddItemsRequest {
            invoice_id,
            items: items.clone(),
        };

        let pairs = request.to_associations();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.invoice_id == invoice_id));
        let linked: Vec<ItemId> = pairs.iter().map(|p| p.item_id).collect();
        assert_eq!(linked, items);
    }

    #[test]
    fn association_result_serializes_with_item_list() {
        let invoice_id = InvoiceId::new();
        let item_id = ItemId::new();
        let json = serde_json::to_value(AssociationResult {
            invoice_id,
            items: vec![item_id],
            success: false,
        })
        .unwrap();

        assert_eq!(json["invoice_id"], invoice_id.to_string());
        assert_eq!(json["items"][0], item_id.to_string());
        assert_eq!(json["success"], false);
    }
}
