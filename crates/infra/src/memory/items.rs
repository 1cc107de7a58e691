use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::{Cursor, ItemId, StoreError, StoreResult};
use stockroom_items::{CreateItem, ItemRecord, ItemRepository, UpdateItem};

use super::{InMemoryDatabase, next};

#[derive(Debug, Clone)]
pub struct InMemoryItemRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryItemRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<ItemRecord>> {
        let tables = self.db.read()?;
        Ok(Cursor::select(cursor, tables.items.iter().cloned()))
    }

    async fn fetch(&self, id: ItemId) -> StoreResult<ItemRecord> {
        let tables = self.db.read()?;
        tables
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, request: &CreateItem) -> StoreResult<ItemRecord> {
        let mut tables = self.db.write()?;
        let now = Utc::now();
        let row = ItemRecord {
            seq: next(&mut tables.item_seq),
            id: ItemId::new(),
            name: request.name.clone(),
            description: request.description.clone(),
            unit_price: request.unit_price,
            created_by: request.created_by.clone(),
            created_at: now,
            last_changed_by: request.created_by.clone(),
            last_update: now,
        };
        tables.items.push(row.clone());
        Ok(row)
    }

    async fn update(&self, request: &UpdateItem) -> StoreResult<ItemRecord> {
        let mut tables = self.db.write()?;
        let row = tables
            .items
            .iter_mut()
            .find(|i| i.id == request.id)
            .ok_or(StoreError::NotFound)?;

        row.name = request.name.clone();
        row.description = request.description.clone();
        row.unit_price = request.unit_price;
        row.last_changed_by = request.last_changed_by.clone();
        row.last_update = Utc::now();
        Ok(row.clone())
    }

    /// Removes the item and, like `ON DELETE CASCADE`, its associations.
    async fn delete(&self, id: ItemId) -> StoreResult<u64> {
        let mut tables = self.db.write()?;
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        let affected = (before - tables.items.len()) as u64;
        if affected > 0 {
            tables.links.retain(|l| l.item_id != id);
        }
        Ok(affected)
    }
}
