//! Persons: the users that own invoices.

pub mod person;
pub mod repository;
pub mod service;

pub use person::{CreatePerson, Person, PersonRecord, UpdatePerson};
pub use repository::PersonRepository;
pub use service::PersonService;
