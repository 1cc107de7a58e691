//! Invoice aggregation.
//!
//! Flat storage rows (`record`) are assembled into the `Invoice` aggregate by
//! `mapper`; the many-to-many invoice/item link is managed by `association`;
//! `service` is the public contract consumed by the HTTP layer.
//!
//! This crate performs no I/O. Storage is reached through `InvoiceRepository`,
//! implemented in `stockroom-infra`.

pub mod association;
pub mod invoice;
pub mod mapper;
pub mod record;
pub mod repository;
pub mod service;

pub use association::{AddItemsRequest, AssociationManager, AssociationResult, SimpleAssociation};
pub use invoice::{CreateInvoice, Invoice, UpdateInvoice};
pub use mapper::{map_collection, map_single, map_with_items};
pub use record::{InvoiceItemJoinRecord, InvoiceRecord};
pub use repository::InvoiceRepository;
pub use service::InvoiceService;
