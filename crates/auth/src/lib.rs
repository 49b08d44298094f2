//! `dealerdesk-auth` — role-based access control for the back office.
//!
//! This crate is intentionally decoupled from HTTP and storage: the matrix
//! and resolution logic are pure, and persistence of administrator-customized
//! grants hides behind the [`OverrideStore`] trait.

pub mod claims;
pub mod engine;
pub mod matrix;
pub mod overrides;
pub mod roles;
pub mod rule;

pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, PrincipalId, TokenValidationError, validate_claims};
pub use engine::{AccessEngine, FunctionalityGrants, RoleGrant, resolve_access};
pub use matrix::{MatrixError, PermissionMatrix, ResourceEntry, default_matrix};
pub use overrides::{OverrideStore, RoleOverrides, ensure_customizable};
pub use roles::Role;
pub use rule::{PatternError, PermissionRule, RoutePattern, RuleId};
