//! Override store implementations.
//!
//! Both implementations enforce the same invariant at the write boundary:
//! the Administrator role never gets a record (see
//! [`dealerdesk_auth::ensure_customizable`]).

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOverrideStore;
pub use postgres::PgOverrideStore;
