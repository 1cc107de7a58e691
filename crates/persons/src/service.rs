use std::sync::Arc;

use tracing::info;

use stockroom_core::{Cursor, DeleteResult, PersonId, StoreResult};

use crate::person::{CreatePerson, Person, UpdatePerson};
use crate::repository::PersonRepository;

#[derive(Clone)]
pub struct PersonService {
    repo: Arc<dyn PersonRepository>,
}

impl PersonService {
    pub fn new(repo: Arc<dyn PersonRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<Person>> {
        let rows = self.repo.fetch_all(cursor).await?;
        Ok(rows.into_iter().map(Person::from).collect())
    }

    pub async fn get(&self, id: PersonId) -> StoreResult<Person> {
        self.repo.fetch(id).await.map(Person::from)
    }

    pub async fn create(&self, request: CreatePerson) -> StoreResult<Person> {
        let row = self.repo.insert(&request).await?;
        info!(person_id = %row.id, seq = row.seq, "person created");
        Ok(row.into())
    }

    pub async fn update(&self, request: UpdatePerson) -> StoreResult<Person> {
        let row = self.repo.update(&request).await?;
        info!(person_id = %row.id, "person updated");
        Ok(row.into())
    }

    pub async fn delete(&self, id: PersonId) -> StoreResult<DeleteResult<PersonId>> {
        let affected = self.repo.delete(id).await?;
        let result = DeleteResult::from_affected(id, affected);
        info!(person_id = %id, deleted = result.deleted, "person delete");
        Ok(result)
    }
}
