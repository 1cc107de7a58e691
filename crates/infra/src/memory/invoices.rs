use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::{Cursor, InvoiceId, StoreError, StoreResult, UserId};
use stockroom_invoicing::{
    CreateInvoice, InvoiceItemJoinRecord, InvoiceRecord, InvoiceRepository, SimpleAssociation,
    UpdateInvoice,
};

use super::{InMemoryDatabase, LinkRow, next};

#[derive(Debug, Clone)]
pub struct InMemoryInvoiceRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryInvoiceRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn fetch(&self, id: InvoiceId) -> StoreResult<InvoiceRecord> {
        let tables = self.db.read()?;
        tables
            .invoices
            .iter()
            .find(|inv| inv.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Emulates `invoices LEFT JOIN invoices_items LEFT JOIN items`.
    async fn fetch_join_rows(&self, id: InvoiceId) -> StoreResult<Vec<InvoiceItemJoinRecord>> {
        let tables = self.db.read()?;
        let Some(invoice) = tables.invoices.iter().find(|inv| inv.id == id) else {
            return Ok(Vec::new());
        };

        let mut links: Vec<&LinkRow> = tables.links.iter().filter(|l| l.invoice_id == id).collect();
        links.sort_by_key(|l| l.seq);

        let rows: Vec<InvoiceItemJoinRecord> = links
            .into_iter()
            .map(|link| {
                let item = tables.items.iter().find(|i| i.id == link.item_id).cloned();
                InvoiceItemJoinRecord::new(invoice.clone(), item)
            })
            .collect();

        if rows.is_empty() {
            return Ok(vec![InvoiceItemJoinRecord::new(invoice.clone(), None)]);
        }
        Ok(rows)
    }

    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<InvoiceRecord>> {
        let tables = self.db.read()?;
        Ok(Cursor::select(cursor, tables.invoices.iter().cloned()))
    }

    async fn fetch_for_user(&self, user_id: UserId) -> StoreResult<Vec<InvoiceRecord>> {
        let tables = self.db.read()?;
        let owned = tables
            .invoices
            .iter()
            .filter(|inv| inv.user_id == user_id)
            .cloned();
        Ok(Cursor::select(None, owned))
    }

    async fn insert(&self, request: &CreateInvoice) -> StoreResult<InvoiceRecord> {
        let mut tables = self.db.write()?;
        if !tables
            .persons
            .iter()
            .any(|p| UserId::from(p.id) == request.user_id)
        {
            return Err(StoreError::Constraint(format!(
                "user {} does not exist",
                request.user_id
            )));
        }

        let now = Utc::now();
        let row = InvoiceRecord {
            seq: next(&mut tables.invoice_seq),
            id: InvoiceId::new(),
            user_id: request.user_id,
            total: request.total,
            paid: request.paid,
            created_by: request.created_by.clone(),
            created_at: now,
            last_changed_by: request.created_by.clone(),
            last_update: now,
        };
        tables.invoices.push(row.clone());
        Ok(row)
    }

    async fn update(&self, request: &UpdateInvoice) -> StoreResult<InvoiceRecord> {
        let mut tables = self.db.write()?;
        let row = tables
            .invoices
            .iter_mut()
            .find(|inv| inv.id == request.id)
            .ok_or(StoreError::NotFound)?;

        row.total = request.total;
        row.paid = request.paid;
        row.last_changed_by = request.last_changed_by.clone();
        row.last_update = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: InvoiceId) -> StoreResult<u64> {
        let mut tables = self.db.write()?;
        let before = tables.invoices.len();
        tables.invoices.retain(|inv| inv.id != id);
        let affected = (before - tables.invoices.len()) as u64;
        if affected > 0 {
            tables.links.retain(|l| l.invoice_id != id);
        }
        Ok(affected)
    }

    /// Validates the whole batch before inserting anything, so a rejected
    /// batch leaves the table untouched.
    async fn insert_associations(&self, pairs: &[SimpleAssociation]) -> StoreResult<u64> {
        let mut tables = self.db.write()?;

        let mut seen = HashSet::with_capacity(pairs.len());
        for pair in pairs {
            if !tables.invoices.iter().any(|inv| inv.id == pair.invoice_id) {
                return Err(StoreError::Constraint(format!(
                    "invoice {} does not exist",
                    pair.invoice_id
                )));
            }
            if !tables.items.iter().any(|i| i.id == pair.item_id) {
                return Err(StoreError::Constraint(format!(
                    "item {} does not exist",
                    pair.item_id
                )));
            }
            let exists = tables
                .links
                .iter()
                .any(|l| l.invoice_id == pair.invoice_id && l.item_id == pair.item_id);
            if exists || !seen.insert(*pair) {
                return Err(StoreError::Conflict(format!(
                    "item {} is already associated with invoice {}",
                    pair.item_id, pair.invoice_id
                )));
            }
        }

        for pair in pairs {
            let seq = next(&mut tables.link_seq);
            tables.links.push(LinkRow {
                seq,
                invoice_id: pair.invoice_id,
                item_id: pair.item_id,
            });
        }
        Ok(pairs.len() as u64)
    }

    async fn delete_association(&self, pair: &SimpleAssociation) -> StoreResult<u64> {
        let mut tables = self.db.write()?;
        let before = tables.links.len();
        tables
            .links
            .retain(|l| !(l.invoice_id == pair.invoice_id && l.item_id == pair.item_id));
        Ok((before - tables.links.len()) as u64)
    }
}
