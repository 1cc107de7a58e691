//! In-memory repositories.
//!
//! Intended for tests/dev. All three repositories share one `InMemoryDatabase`
//! so the relational rules of the Postgres schema hold here too:
//! - sequence ids are assigned per table, starting at 1, never reused
//! - an invoice must reference an existing person (`Constraint` otherwise)
//! - an association must reference an existing invoice and item, and a pair
//!   may exist only once (`Conflict` otherwise)
//! - deleting an invoice or item removes its associations; deleting a person
//!   that still owns invoices is a `Constraint` violation

mod invoices;
mod items;
mod persons;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockroom_core::{InvoiceId, ItemId, StoreError, StoreResult};
use stockroom_invoicing::InvoiceRecord;
use stockroom_items::ItemRecord;
use stockroom_persons::PersonRecord;

pub use invoices::InMemoryInvoiceRepository;
pub use items::InMemoryItemRepository;
pub use persons::InMemoryPersonRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinkRow {
    seq: i64,
    invoice_id: InvoiceId,
    item_id: ItemId,
}

#[derive(Debug, Default)]
struct Tables {
    persons: Vec<PersonRecord>,
    items: Vec<ItemRecord>,
    invoices: Vec<InvoiceRecord>,
    links: Vec<LinkRow>,
    person_seq: i64,
    item_seq: i64,
    invoice_seq: i64,
    link_seq: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Shared row storage behind the in-memory repositories.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}
