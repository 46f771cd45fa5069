//! Recipe and ingredient catalog persisted to a local key-value store.
//!
//! Each collection lives under one storage key and is owned by a
//! [`Repository`], which loads it, applies create/update/delete operations,
//! and writes the whole collection back after every mutation.

pub mod catalog;
pub mod codec;
mod collection;
pub mod models;
pub mod repository;
pub mod seed;
pub mod store;

pub use catalog::{Catalog, CatalogKeys};
pub use collection::Collection;
pub use models::{Ingredient, Recipe, Record, RecordId, ValidationError};
pub use repository::{Repository, RepositoryError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
