use std::sync::Arc;

use stockroom_core::StoreResult;
use stockroom_invoicing::InvoiceRepository;
use stockroom_items::ItemRepository;
use stockroom_persons::PersonRepository;

use crate::db::Database;
use crate::memory::{
    InMemoryDatabase, InMemoryInvoiceRepository, InMemoryItemRepository, InMemoryPersonRepository,
};
use crate::postgres::{PostgresInvoiceRepository, PostgresItemRepository, PostgresPersonRepository};

/// One repository per entity, ready to hand to the service constructors.
#[derive(Clone)]
pub struct Stores {
    pub persons: Arc<dyn PersonRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    database: Option<Database>,
}

impl Stores {
    /// Repositories sharing `database`'s pool.
    pub fn postgres(database: &Database) -> Self {
        let pool = database.pool();
        Self {
            persons: Arc::new(PostgresPersonRepository::new(pool.clone())),
            items: Arc::new(PostgresItemRepository::new(pool.clone())),
            invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
            database: Some(database.clone()),
        }
    }

    /// Fresh, empty in-memory repositories sharing one set of tables.
    pub fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            persons: Arc::new(InMemoryPersonRepository::new(Arc::clone(&db))),
            items: Arc::new(InMemoryItemRepository::new(Arc::clone(&db))),
            invoices: Arc::new(InMemoryInvoiceRepository::new(db)),
            database: None,
        }
    }

    /// Round-trips to the database backing these stores. The in-memory
    /// backend is always reachable.
    pub async fn health_check(&self) -> StoreResult<()> {
        match &self.database {
            Some(database) => database.health_check().await,
            None => Ok(()),
        }
    }
}
