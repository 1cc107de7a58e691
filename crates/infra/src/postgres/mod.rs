//! sqlx-backed repositories.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate `(invoice_id, item_id)` association |
//! | Database (foreign key violation) | `23503` | `Constraint` | Invoice for an unknown user, association to an unknown item |
//! | Database (not-null / check violation) | `23502` / `23514` | `Constraint` | Invalid column value |
//! | Database (other) | Any other | `Query` | Other database errors |
//! | RowNotFound | N/A | `NotFound` | `fetch_one` on a missing id |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` | Pool shut down or connection failure |
//! | Other | N/A | `Query` | Decode failures, protocol errors, etc. |
//!
//! ## Thread Safety
//!
//! Every repository is `Send + Sync` and shares the SQLx pool, which handles
//! connection checkout.

mod invoices;
mod items;
mod persons;

pub use invoices::PostgresInvoiceRepository;
pub use items::PostgresItemRepository;
pub use persons::PostgresPersonRepository;

use stockroom_core::StoreError;

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23503") | Some("23502") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Query(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("i/o error in {}: {}", operation, e)),
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}
