use async_trait::async_trait;

use stockroom_core::{Cursor, PersonId, StoreResult};

use crate::person::{CreatePerson, PersonRecord, UpdatePerson};

/// Storage boundary for persons.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<PersonRecord>>;

    async fn fetch(&self, id: PersonId) -> StoreResult<PersonRecord>;

    async fn insert(&self, request: &CreatePerson) -> StoreResult<PersonRecord>;

    async fn update(&self, request: &UpdatePerson) -> StoreResult<PersonRecord>;

    /// Returns the number of rows removed (0 when `id` is unknown).
    async fn delete(&self, id: PersonId) -> StoreResult<u64>;
}
