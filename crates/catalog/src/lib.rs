//! `dealerdesk-catalog` — catalog collaborator shapes.
//!
//! The catalog itself (CRUD, persistence, schema) belongs to the excluded
//! back-office plumbing; this crate carries only the record shapes and the
//! read contract the pricing and access engines consume.

pub mod provider;
pub mod records;

pub use provider::{CatalogProvider, InMemoryCatalog};
pub use records::{
    Brand, Color, ExemptionTiers, Model, Optional, PaintType, Version, VersionColor,
    VersionOptional,
};
