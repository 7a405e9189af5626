//! Persistent storage for census person records.
//!
//! A minimal document store: one JSON file per validated record, keyed by
//! the record's deterministic id. Provides the CRUD surface the rest of the
//! system needs (`create`, `find_by_id`, `update`, `delete`, `list`) plus
//! async wrappers for use from the HTTP layer.
//!
//! # Example
//!
//! ```ignore
//! use census_store::PersonStore;
//!
//! let store = PersonStore::open("data/persons")?;
//! let id = store.create(&person)?;
//! let listed = store.list()?;
//! ```

mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::PersonStore;
