//! Items: independently owned catalogue entries that invoices link to.
//!
//! This crate holds the row shape, the domain model, the repository boundary
//! and the service. Storage implementations live in `stockroom-infra`.

pub mod item;
pub mod repository;
pub mod service;

pub use item::{CreateItem, Item, ItemRecord, UpdateItem};
pub use repository::ItemRepository;
pub use service::ItemService;
