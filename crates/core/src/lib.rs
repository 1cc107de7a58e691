//! `stockroom-core`: shared building blocks for the inventory service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod audit;
pub mod delete;
pub mod entity;
pub mod error;
pub mod id;
pub mod pagination;

pub use audit::{AuditInfo, format_timestamp};
pub use delete::DeleteResult;
pub use entity::Entity;
pub use error::{DomainError, StoreError, StoreResult};
pub use id::{InvoiceId, ItemId, PersonId, UserId};
pub use pagination::Cursor;
