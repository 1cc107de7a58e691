//! Infrastructure layer: configuration, Postgres pool, repository implementations.

pub mod config;
pub mod db;
pub mod memory;
pub mod postgres;
pub mod stores;

mod integration_tests;

pub use config::{AppConfig, ConfigError, DbConfig, StoreBackend};
pub use db::{Database, connect};
pub use stores::Stores;
