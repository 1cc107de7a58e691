use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use stockroom_core::{Cursor, PersonId, StoreResult};
use stockroom_persons::{CreatePerson, PersonRecord, PersonRepository, UpdatePerson};

use super::map_sqlx_error;

const COLUMNS: &str =
    "id, alt_id, name, email, created_by, created_at, last_changed_by, last_update";

/// Postgres-backed person repository over the `persons` table.
#[derive(Debug, Clone)]
pub struct PostgresPersonRepository {
    pool: Arc<PgPool>,
}

impl PostgresPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    #[instrument(skip(self), fields(row_count), err)]
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<PersonRecord>> {
        let rows = match cursor {
            None => {
                sqlx::query_as::<_, PersonRow>(&format!(
                    "SELECT {COLUMNS} FROM persons ORDER BY id"
                ))
                .fetch_all(&*self.pool)
                .await
            }
            Some(c) => {
                sqlx::query_as::<_, PersonRow>(&format!(
                    "SELECT {COLUMNS} FROM persons WHERE id > $1 ORDER BY id LIMIT $2"
                ))
                .bind(c.last_id)
                .bind(c.page_size)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("fetch_all_persons", e))?;

        Span::current().record("row_count", rows.len());
        Ok(rows.into_iter().map(PersonRecord::from).collect())
    }

    #[instrument(skip(self), fields(person_id = %id), err)]
    async fn fetch(&self, id: PersonId) -> StoreResult<PersonRecord> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {COLUMNS} FROM persons WHERE alt_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_person", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self, request), fields(person_id), err)]
    async fn insert(&self, request: &CreatePerson) -> StoreResult<PersonRecord> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            INSERT INTO persons (name, email, created_by, last_changed_by)
            VALUES ($1, $2, $3, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.created_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_person", e))?;

        Span::current().record("person_id", tracing::field::display(row.alt_id));
        Ok(row.into())
    }

    #[instrument(skip(self, request), fields(person_id = %request.id), err)]
    async fn update(&self, request: &UpdatePerson) -> StoreResult<PersonRecord> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            UPDATE persons
            SET name = $2, email = $3, last_changed_by = $4, last_update = now()
            WHERE alt_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.id.as_uuid())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.last_changed_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_person", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(person_id = %id, rows_affected), err)]
    async fn delete(&self, id: PersonId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM persons WHERE alt_id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_person", e))?;

        let affected = result.rows_affected();
        Span::current().record("rows_affected", affected);
        Ok(affected)
    }
}

// SQLx row types

#[derive(Debug)]
struct PersonRow {
    id: i64,
    alt_id: uuid::Uuid,
    name: String,
    email: String,
    created_by: String,
    created_at: DateTime<Utc>,
    last_changed_by: String,
    last_update: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for PersonRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(PersonRow {
            id: row.try_get("id")?,
            alt_id: row.try_get("alt_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            last_changed_by: row.try_get("last_changed_by")?,
            last_update: row.try_get("last_update")?,
        })
    }
}

impl From<PersonRow> for PersonRecord {
    fn from(row: PersonRow) -> Self {
        PersonRecord {
            seq: row.id,
            id: PersonId::from_uuid(row.alt_id),
            name: row.name,
            email: row.email,
            created_by: row.created_by,
            created_at: row.created_at,
            last_changed_by: row.last_changed_by,
            last_update: row.last_update,
        }
    }
}
