//! `dealerdesk-pricing` — the price composition engine.
//!
//! A [`Quote`](quote::Quote) is session-local state recomputed on every
//! input change; nothing here performs I/O or persists.

pub mod quote;

pub use quote::{PriceBreakdown, Quote, SelectedColor};
