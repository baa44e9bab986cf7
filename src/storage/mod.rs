//! Storage: the store port and its SQLite document store.

pub mod schema;
pub mod sqlite;
pub mod store;

pub use sqlite::SqliteStore;
pub use store::{Store, StoreError};
