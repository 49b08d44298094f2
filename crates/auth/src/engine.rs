//! Access resolution: matrix defaults + stored overrides → one decision.
//!
//! The engine is the single decision point consumed by route guards and API
//! authorization checks. Override state is read through an explicitly
//! injected store, never ambient globals, so a fresh administrator save is
//! visible to the very next decision and tests can drive the pure resolver
//! with hand-built override maps.

use std::sync::Arc;

use serde::Serialize;

use dealerdesk_core::DomainResult;

use crate::matrix::{PermissionMatrix, ResourceEntry};
use crate::overrides::{OverrideStore, RoleOverrides};
use crate::roles::Role;
use crate::rule::RuleId;

/// Pure resolution with an injected override map.
///
/// - Administrator: always allowed, independent of matrix and overrides.
/// - Unregistered path: denied.
/// - Otherwise: the override entry for the resolved rule wins; the matrix
///   default applies when no entry exists.
pub fn resolve_access(
    matrix: &PermissionMatrix,
    overrides: Option<&RoleOverrides>,
    path: &str,
    role: Role,
) -> bool {
    if role.is_administrator() {
        return true;
    }

    let Some(rule) = matrix.resolve(path) else {
        return false;
    };

    if let Some(overrides) = overrides {
        if let Some(allowed) = overrides.get(rule.id()) {
            return allowed;
        }
    }

    rule.allows(role)
}

/// Effective grant of one customizable role for one functionality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrant {
    pub role: Role,
    pub default_allowed: bool,
    pub effective_allowed: bool,
    pub overridden: bool,
}

/// One row of the permission comparison report: a functionality (rules
/// de-duplicated by description) and each customizable role's grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionalityGrants {
    pub description: String,
    pub rule_ids: Vec<RuleId>,
    pub grants: Vec<RoleGrant>,
}

/// The decision point: compiled matrix + override store.
#[derive(Clone)]
pub struct AccessEngine<S> {
    matrix: Arc<PermissionMatrix>,
    store: S,
}

impl<S: OverrideStore> AccessEngine<S> {
    pub fn new(matrix: Arc<PermissionMatrix>, store: S) -> Self {
        Self { matrix, store }
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Allow/deny for a navigation target or API action.
    ///
    /// An absent role (unauthenticated caller) is always denied. At most one
    /// store read is performed, and only for customizable roles.
    pub async fn can_access(&self, path: &str, role: Option<Role>) -> DomainResult<bool> {
        let Some(role) = role else {
            return Ok(false);
        };

        if role.is_administrator() {
            return Ok(true);
        }

        let overrides = self.store.get(role).await?;
        Ok(resolve_access(&self.matrix, overrides.as_ref(), path, role))
    }

    /// Resources the role can open, with overrides applied (menu source).
    ///
    /// Administrator enumerates the full table.
    pub async fn accessible_resources(&self, role: Role) -> DomainResult<Vec<ResourceEntry>> {
        if role.is_administrator() {
            return Ok(self
                .matrix
                .rules()
                .iter()
                .map(|rule| ResourceEntry {
                    path: rule.pattern().raw().to_string(),
                    description: rule.description().to_string(),
                })
                .collect());
        }

        let overrides = self.store.get(role).await?;

        Ok(self
            .matrix
            .rules()
            .iter()
            .filter(|rule| {
                overrides
                    .as_ref()
                    .and_then(|o| o.get(rule.id()))
                    .unwrap_or_else(|| rule.allows(role))
            })
            .map(|rule| ResourceEntry {
                path: rule.pattern().raw().to_string(),
                description: rule.description().to_string(),
            })
            .collect())
    }

    /// The permission settings screen's data: every functionality with each
    /// customizable role's default and effective grant.
    pub async fn comparison_report(&self) -> DomainResult<Vec<FunctionalityGrants>> {
        let mut per_role = Vec::new();
        for role in Role::customizable() {
            per_role.push((role, self.store.get(role).await?));
        }

        let report = self
            .matrix
            .functionalities()
            .into_iter()
            .map(|(description, rule_ids)| {
                let grants = per_role
                    .iter()
                    .map(|(role, overrides)| {
                        // Rules sharing a description carry identical role
                        // sets, so the first member's default speaks for all.
                        let default_allowed = rule_ids
                            .first()
                            .and_then(|id| self.matrix.rule(id))
                            .map(|rule| rule.allows(*role))
                            .unwrap_or(false);

                        let override_value = overrides.as_ref().and_then(|o| {
                            rule_ids.iter().find_map(|id| o.get(id))
                        });

                        RoleGrant {
                            role: *role,
                            default_allowed,
                            effective_allowed: override_value.unwrap_or(default_allowed),
                            overridden: override_value.is_some(),
                        }
                    })
                    .collect();

                FunctionalityGrants {
                    description,
                    rule_ids,
                    grants,
                }
            })
            .collect();

        Ok(report)
    }
}
