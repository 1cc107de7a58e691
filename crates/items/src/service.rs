use std::sync::Arc;

use tracing::info;

use stockroom_core::{Cursor, DeleteResult, ItemId, StoreResult};

use crate::item::{CreateItem, Item, UpdateItem};
use crate::repository::ItemRepository;

/// Item use cases over an injected repository.
#[derive(Clone)]
pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<Item>> {
        let rows = self.repo.fetch_all(cursor).await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    pub async fn get(&self, id: ItemId) -> StoreResult<Item> {
        self.repo.fetch(id).await.map(Item::from)
    }

    pub async fn create(&self, request: CreateItem) -> StoreResult<Item> {
        let row = self.repo.insert(&request).await?;
        info!(item_id = %row.id, seq = row.seq, "item created");
        Ok(row.into())
    }

    pub async fn update(&self, request: UpdateItem) -> StoreResult<Item> {
        let row = self.repo.update(&request).await?;
        info!(item_id = %row.id, "item updated");
        Ok(row.into())
    }

    pub async fn delete(&self, id: ItemId) -> StoreResult<DeleteResult<ItemId>> {
        let affected = self.repo.delete(id).await?;
        let result = DeleteResult::from_affected(id, affected);
        info!(item_id = %id, deleted = result.deleted, "item delete");
        Ok(result)
    }
}
