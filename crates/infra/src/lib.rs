//! Infrastructure layer: persistence adapters for the override store.

pub mod override_store;

pub use override_store::{InMemoryOverrideStore, PgOverrideStore};
