use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::{Cursor, PersonId, StoreError, StoreResult, UserId};
use stockroom_persons::{CreatePerson, PersonRecord, PersonRepository, UpdatePerson};

use super::{InMemoryDatabase, next};

#[derive(Debug, Clone)]
pub struct InMemoryPersonRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryPersonRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<PersonRecord>> {
        let tables = self.db.read()?;
        Ok(Cursor::select(cursor, tables.persons.iter().cloned()))
    }

    async fn fetch(&self, id: PersonId) -> StoreResult<PersonRecord> {
        let tables = self.db.read()?;
        tables
            .persons
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, request: &CreatePerson) -> StoreResult<PersonRecord> {
        let mut tables = self.db.write()?;
        let now = Utc::now();
        let row = PersonRecord {
            seq: next(&mut tables.person_seq),
            id: PersonId::new(),
            name: request.name.clone(),
            email: request.email.clone(),
            created_by: request.created_by.clone(),
            created_at: now,
            last_changed_by: request.created_by.clone(),
            last_update: now,
        };
        tables.persons.push(row.clone());
        Ok(row)
    }

    async fn update(&self, request: &UpdatePerson) -> StoreResult<PersonRecord> {
        let mut tables = self.db.write()?;
        let row = tables
            .persons
            .iter_mut()
            .find(|p| p.id == request.id)
            .ok_or(StoreError::NotFound)?;

        row.name = request.name.clone();
        row.email = request.email.clone();
        row.last_changed_by = request.last_changed_by.clone();
        row.last_update = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: PersonId) -> StoreResult<u64> {
        let mut tables = self.db.write()?;
        let owner = UserId::from(id);
        if tables.invoices.iter().any(|inv| inv.user_id == owner) {
            return Err(StoreError::Constraint(format!(
                "person {id} is still referenced by invoices"
            )));
        }

        let before = tables.persons.len();
        tables.persons.retain(|p| p.id != id);
        Ok((before - tables.persons.len()) as u64)
    }
}
