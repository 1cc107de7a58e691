use async_trait::async_trait;

use stockroom_core::{Cursor, ItemId, StoreResult};

use crate::item::{CreateItem, ItemRecord, UpdateItem};

/// Storage boundary for items.
///
/// Implementations must:
/// - assign a monotonically increasing `seq` and a fresh external id on insert
/// - return `StoreError::NotFound` when a fetch/update matches zero rows
/// - report the affected-row count from `delete` rather than failing on a miss
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<ItemRecord>>;

    async fn fetch(&self, id: ItemId) -> StoreResult<ItemRecord>;

    async fn insert(&self, request: &CreateItem) -> StoreResult<ItemRecord>;

    async fn update(&self, request: &UpdateItem) -> StoreResult<ItemRecord>;

    async fn delete(&self, id: ItemId) -> StoreResult<u64>;
}
