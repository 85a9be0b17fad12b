//! Product catalog: data model, seed data, persistence and the store

pub mod persist;
pub mod seed;
pub mod store;
pub mod types;

pub use store::{CatalogChange, CatalogStore, ChangeKind};
pub use types::{Catalog, NewProduct, Product};
