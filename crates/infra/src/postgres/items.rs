use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use stockroom_core::{Cursor, ItemId, StoreResult};
use stockroom_items::{CreateItem, ItemRecord, ItemRepository, UpdateItem};

use super::map_sqlx_error;

const COLUMNS: &str =
    "id, alt_id, name, description, unit_price, created_by, created_at, last_changed_by, last_update";

/// Postgres-backed item repository over the `items` table.
#[derive(Debug, Clone)]
pub struct PostgresItemRepository {
    pool: Arc<PgPool>,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    #[instrument(skip(self), fields(row_count), err)]
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<ItemRecord>> {
        let rows = match cursor {
            None => {
                sqlx::query_as::<_, ItemRow>(&format!(
                    "SELECT {COLUMNS} FROM items ORDER BY id"
                ))
                .fetch_all(&*self.pool)
                .await
            }
            Some(c) => {
                sqlx::query_as::<_, ItemRow>(&format!(
                    "SELECT {COLUMNS} FROM items WHERE id > $1 ORDER BY id LIMIT $2"
                ))
                .bind(c.last_id)
                .bind(c.page_size)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("fetch_all_items", e))?;

        Span::current().record("row_count", rows.len());
        Ok(rows.into_iter().map(ItemRecord::from).collect())
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn fetch(&self, id: ItemId) -> StoreResult<ItemRecord> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {COLUMNS} FROM items WHERE alt_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_item", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self, request), fields(item_id), err)]
    async fn insert(&self, request: &CreateItem) -> StoreResult<ItemRecord> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO items (name, description, unit_price, created_by, last_changed_by)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.unit_price)
        .bind(&request.created_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_item", e))?;

        Span::current().record("item_id", tracing::field::display(row.alt_id));
        Ok(row.into())
    }

    #[instrument(skip(self, request), fields(item_id = %request.id), err)]
    async fn update(&self, request: &UpdateItem) -> StoreResult<ItemRecord> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE items
            SET name = $2, description = $3, unit_price = $4, last_changed_by = $5,
                last_update = now()
            WHERE alt_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.id.as_uuid())
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.unit_price)
        .bind(&request.last_changed_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_item", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(item_id = %id, rows_affected), err)]
    async fn delete(&self, id: ItemId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM items WHERE alt_id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;

        let affected = result.rows_affected();
        Span::current().record("rows_affected", affected);
        Ok(affected)
    }
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    id: i64,
    alt_id: uuid::Uuid,
    name: String,
    description: String,
    unit_price: f64,
    created_by: String,
    created_at: DateTime<Utc>,
    last_changed_by: String,
    last_update: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            id: row.try_get("id")?,
            alt_id: row.try_get("alt_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            unit_price: row.try_get("unit_price")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            last_changed_by: row.try_get("last_changed_by")?,
            last_update: row.try_get("last_update")?,
        })
    }
}

impl From<ItemRow> for ItemRecord {
    fn from(row: ItemRow) -> Self {
        ItemRecord {
            seq: row.id,
            id: ItemId::from_uuid(row.alt_id),
            name: row.name,
            description: row.description,
            unit_price: row.unit_price,
            created_by: row.created_by,
            created_at: row.created_at,
            last_changed_by: row.last_changed_by,
            last_update: row.last_update,
        }
    }
}
