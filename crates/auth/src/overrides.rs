//! Administrator-customized permission grants.
//!
//! One override record per non-Administrator role. An absent record means
//! the role runs entirely on matrix defaults; resetting a role deletes the
//! record rather than writing a map of defaults back.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use dealerdesk_core::{DomainError, DomainResult};

use crate::roles::Role;
use crate::rule::RuleId;

/// A role's stored grant replacements, keyed by rule id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleOverrides {
    grants: HashMap<RuleId, bool>,
}

impl RoleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, rule: RuleId, allowed: bool) -> &mut Self {
        self.grants.insert(rule, allowed);
        self
    }

    pub fn get(&self, rule: &RuleId) -> Option<bool> {
        self.grants.get(rule).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleId, bool)> {
        self.grants.iter().map(|(id, allowed)| (id, *allowed))
    }
}

impl From<HashMap<RuleId, bool>> for RoleOverrides {
    fn from(grants: HashMap<RuleId, bool>) -> Self {
        Self { grants }
    }
}

impl FromIterator<(RuleId, bool)> for RoleOverrides {
    fn from_iter<I: IntoIterator<Item = (RuleId, bool)>>(iter: I) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

/// Guard shared by every store implementation: the Administrator role's
/// grants are immutable, so no store may hold a record for it.
pub fn ensure_customizable(role: Role) -> DomainResult<()> {
    if role.is_administrator() {
        return Err(DomainError::Unauthorized);
    }
    Ok(())
}

/// Persistence contract for per-role grant overrides.
///
/// Writes replace the whole map for one role and must be atomic at that
/// granularity (last writer wins, never a partial map). `reset` is
/// idempotent: deleting an absent record is a no-op, not an error.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    async fn get(&self, role: Role) -> DomainResult<Option<RoleOverrides>>;

    async fn save(&self, role: Role, overrides: RoleOverrides) -> DomainResult<()>;

    async fn reset(&self, role: Role) -> DomainResult<()>;
}

#[async_trait]
impl<S> OverrideStore for std::sync::Arc<S>
where
    S: OverrideStore + ?Sized,
{
    async fn get(&self, role: Role) -> DomainResult<Option<RoleOverrides>> {
        (**self).get(role).await
    }

    async fn save(&self, role: Role, overrides: RoleOverrides) -> DomainResult<()> {
        (**self).save(role, overrides).await
    }

    async fn reset(&self, role: Role) -> DomainResult<()> {
        (**self).reset(role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_is_never_customizable() {
        assert_eq!(
            ensure_customizable(Role::Administrator),
            Err(DomainError::Unauthorized)
        );
        assert_eq!(ensure_customizable(Role::Registrar), Ok(()));
        assert_eq!(ensure_customizable(Role::User), Ok(()));
    }

    #[test]
    fn overrides_round_trip_through_json() {
        let mut overrides = RoleOverrides::new();
        overrides.set(RuleId::new("brands_new"), false);
        overrides.set(RuleId::new("configurator"), true);

        let json = serde_json::to_string(&overrides).unwrap();
        let back: RoleOverrides = serde_json::from_str(&json).unwrap();
        assert_eq!(back, overrides);
        assert_eq!(back.get(&RuleId::new("brands_new")), Some(false));
        assert_eq!(back.get(&RuleId::new("missing")), None);
    }
}
