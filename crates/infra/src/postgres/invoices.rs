use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use stockroom_core::{Cursor, InvoiceId, ItemId, StoreResult, UserId};
use stockroom_invoicing::{
    CreateInvoice, InvoiceItemJoinRecord, InvoiceRecord, InvoiceRepository, SimpleAssociation,
    UpdateInvoice,
};
use stockroom_items::ItemRecord;

use super::map_sqlx_error;

const COLUMNS: &str =
    "id, alt_id, user_id, total, paid, created_by, created_at, last_changed_by, last_update";

/// Postgres-backed invoice repository over `invoices` and `invoices_items`.
///
/// The join fetch is a LEFT JOIN so an invoice without items still yields one
/// row, with every `item_*` column NULL. Join rows are ordered by the link
/// table's sequence, which is association insertion order.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceRepository {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn fetch(&self, id: InvoiceId) -> StoreResult<InvoiceRecord> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE alt_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_invoice", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(invoice_id = %id, row_count), err)]
    async fn fetch_join_rows(&self, id: InvoiceId) -> StoreResult<Vec<InvoiceItemJoinRecord>> {
        let rows = sqlx::query_as::<_, InvoiceJoinRow>(
            r#"
            SELECT
                inv.id,
                inv.alt_id,
                inv.user_id,
                inv.total,
                inv.paid,
                inv.created_by,
                inv.created_at,
                inv.last_changed_by,
                inv.last_update,
                it.id AS item_seq,
                it.alt_id AS item_alt_id,
                it.name AS item_name,
                it.description AS item_description,
                it.unit_price AS item_unit_price,
                it.created_by AS item_created_by,
                it.created_at AS item_created_at,
                it.last_changed_by AS item_last_changed_by,
                it.last_update AS item_last_update
            FROM invoices inv
            LEFT JOIN invoices_items link ON link.invoice_id = inv.alt_id
            LEFT JOIN items it ON it.alt_id = link.item_id
            WHERE inv.alt_id = $1
            ORDER BY link.id
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_invoice_join_rows", e))?;

        Span::current().record("row_count", rows.len());
        Ok(rows.into_iter().map(InvoiceItemJoinRecord::from).collect())
    }

    #[instrument(skip(self), fields(row_count), err)]
    async fn fetch_all(&self, cursor: Option<Cursor>) -> StoreResult<Vec<InvoiceRecord>> {
        let rows = match cursor {
            None => {
                sqlx::query_as::<_, InvoiceRow>(&format!(
                    "SELECT {COLUMNS} FROM invoices ORDER BY id"
                ))
                .fetch_all(&*self.pool)
                .await
            }
            Some(c) => {
                sqlx::query_as::<_, InvoiceRow>(&format!(
                    "SELECT {COLUMNS} FROM invoices WHERE id > $1 ORDER BY id LIMIT $2"
                ))
                .bind(c.last_id)
                .bind(c.page_size)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("fetch_all_invoices", e))?;

        Span::current().record("row_count", rows.len());
        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id, row_count), err)]
    async fn fetch_for_user(&self, user_id: UserId) -> StoreResult<Vec<InvoiceRecord>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_invoices_for_user", e))?;

        Span::current().record("row_count", rows.len());
        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, invoice_id), err)]
    async fn insert(&self, request: &CreateInvoice) -> StoreResult<InvoiceRecord> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            INSERT INTO invoices (user_id, total, paid, created_by, last_changed_by)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.user_id.as_uuid())
        .bind(request.total)
        .bind(request.paid)
        .bind(&request.created_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_invoice", e))?;

        Span::current().record("invoice_id", tracing::field::display(row.alt_id));
        Ok(row.into())
    }

    #[instrument(skip(self, request), fields(invoice_id = %request.id), err)]
    async fn update(&self, request: &UpdateInvoice) -> StoreResult<InvoiceRecord> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            UPDATE invoices
            SET total = $2, paid = $3, last_changed_by = $4, last_update = now()
            WHERE alt_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.id.as_uuid())
        .bind(request.total)
        .bind(request.paid)
        .bind(&request.last_changed_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_invoice", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(invoice_id = %id, rows_affected), err)]
    async fn delete(&self, id: InvoiceId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM invoices WHERE alt_id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;

        let affected = result.rows_affected();
        Span::current().record("rows_affected", affected);
        Ok(affected)
    }

    /// One `INSERT ... SELECT UNNEST(..)` statement for the whole batch.
    #[instrument(skip(self, pairs), fields(pair_count = pairs.len(), rows_affected), err)]
    async fn insert_associations(&self, pairs: &[SimpleAssociation]) -> StoreResult<u64> {
        let (invoice_ids, item_ids): (Vec<uuid::Uuid>, Vec<uuid::Uuid>) = pairs
            .iter()
            .map(|p| (*p.invoice_id.as_uuid(), *p.item_id.as_uuid()))
            .unzip();

        let result = sqlx::query(
            r#"
            INSERT INTO invoices_items (invoice_id, item_id)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
            "#,
        )
        .bind(invoice_ids)
        .bind(item_ids)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_invoice_items", e))?;

        let affected = result.rows_affected();
        Span::current().record("rows_affected", affected);
        Ok(affected)
    }

    #[instrument(
        skip(self, pair),
        fields(invoice_id = %pair.invoice_id, item_id = %pair.item_id, rows_affected),
        err
    )]
    async fn delete_association(&self, pair: &SimpleAssociation) -> StoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM invoices_items WHERE invoice_id = $1 AND item_id = $2")
                .bind(pair.invoice_id.as_uuid())
                .bind(pair.item_id.as_uuid())
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("delete_invoice_item", e))?;

        let affected = result.rows_affected();
        Span::current().record("rows_affected", affected);
        Ok(affected)
    }
}

// SQLx row types

#[derive(Debug)]
struct InvoiceRow {
    id: i64,
    alt_id: uuid::Uuid,
    user_id: uuid::Uuid,
    total: f64,
    paid: bool,
    created_by: String,
    created_at: DateTime<Utc>,
    last_changed_by: String,
    last_update: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for InvoiceRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InvoiceRow {
            id: row.try_get("id")?,
            alt_id: row.try_get("alt_id")?,
            user_id: row.try_get("user_id")?,
            total: row.try_get("total")?,
            paid: row.try_get("paid")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            last_changed_by: row.try_get("last_changed_by")?,
            last_update: row.try_get("last_update")?,
        })
    }
}

impl From<InvoiceRow> for InvoiceRecord {
    fn from(row: InvoiceRow) -> Self {
        InvoiceRecord {
            seq: row.id,
            id: InvoiceId::from_uuid(row.alt_id),
            user_id: UserId::from_uuid(row.user_id),
            total: row.total,
            paid: row.paid,
            created_by: row.created_by,
            created_at: row.created_at,
            last_changed_by: row.last_changed_by,
            last_update: row.last_update,
        }
    }
}

/// `item_*` columns of a join row. Only decoded when `item_seq` is non-null.
#[derive(Debug)]
struct JoinedItemRow {
    seq: i64,
    alt_id: uuid::Uuid,
    name: String,
    description: String,
    unit_price: f64,
    created_by: String,
    created_at: DateTime<Utc>,
    last_changed_by: String,
    last_update: DateTime<Utc>,
}

#[derive(Debug)]
struct InvoiceJoinRow {
    invoice: InvoiceRow,
    item: Option<JoinedItemRow>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for InvoiceJoinRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        let invoice = InvoiceRow::from_row(row)?;
        let item = match row.try_get::<Option<i64>, _>("item_seq")? {
            None => None,
            Some(seq) => Some(JoinedItemRow {
                seq,
                alt_id: row.try_get("item_alt_id")?,
                name: row.try_get("item_name")?,
                description: row.try_get("item_description")?,
                unit_price: row.try_get("item_unit_price")?,
                created_by: row.try_get("item_created_by")?,
                created_at: row.try_get("item_created_at")?,
                last_changed_by: row.try_get("item_last_changed_by")?,
                last_update: row.try_get("item_last_update")?,
            }),
        };
        Ok(InvoiceJoinRow { invoice, item })
    }
}

impl From<JoinedItemRow> for ItemRecord {
    fn from(row: JoinedItemRow) -> Self {
        ItemRecord {
            seq: row.seq,
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

impl From<InvoiceJoinRow> for InvoiceItemJoinRecord {
    fn from(row: InvoiceJoinRow) -> Self {
        InvoiceItemJoinRecord::new(row.invoice.into(), row.item.map(ItemRecord::from))
    }
}
