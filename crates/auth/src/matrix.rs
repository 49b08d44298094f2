//! The compiled-in permission matrix.
//!
//! The matrix is the default answer to "which roles may open this path".
//! Administrator customizations live in the override store and are layered
//! on top by the resolution engine; the matrix itself never changes at
//! runtime.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::roles::Role;
use crate::rule::{PatternError, PermissionRule, RoutePattern, RuleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: PatternError,
    },

    #[error("duplicate rule id '{0}'")]
    DuplicateRuleId(String),
}

/// A navigable resource visible to some role (menu/report entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub path: String,
    pub description: String,
}

/// The static path → allowed-roles table plus its resolution logic.
#[derive(Debug)]
pub struct PermissionMatrix {
    rules: Vec<PermissionRule>,
    by_id: HashMap<RuleId, usize>,
}

impl PermissionMatrix {
    /// Build and validate a matrix from `(id, pattern, allowed, description)`
    /// rows. Every pattern is compiled here, once; malformed rows abort the
    /// build so a broken table can never reach request handling.
    pub fn build(
        rows: Vec<(RuleId, &'static str, Vec<Role>, &'static str)>,
    ) -> Result<Self, MatrixError> {
        let mut rules = Vec::with_capacity(rows.len());
        let mut by_id = HashMap::with_capacity(rows.len());

        for (id, pattern, allowed, description) in rows {
            let pattern =
                RoutePattern::compile(pattern).map_err(|source| MatrixError::InvalidPattern {
                    rule: id.as_str().to_string(),
                    source,
                })?;

            if by_id.insert(id.clone(), rules.len()).is_some() {
                return Err(MatrixError::DuplicateRuleId(id.as_str().to_string()));
            }

            rules.push(PermissionRule::new(id, pattern, allowed, description));
        }

        Ok(Self { rules, by_id })
    }

    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    pub fn rule(&self, id: &RuleId) -> Option<&PermissionRule> {
        self.by_id.get(id).map(|&idx| &self.rules[idx])
    }

    /// Resolve a request path to its governing rule.
    ///
    /// First match wins across three passes: exact literal, parameterized,
    /// then the longest literal prefix at a segment boundary. `None` means
    /// the path is unregistered and access is denied by default.
    pub fn resolve(&self, path: &str) -> Option<&PermissionRule> {
        if let Some(rule) = self
            .rules
            .iter()
            .find(|rule| !rule.pattern().has_params() && rule.pattern().matches(path))
        {
            return Some(rule);
        }

        if let Some(rule) = self
            .rules
            .iter()
            .find(|rule| rule.pattern().has_params() && rule.pattern().matches(path))
        {
            return Some(rule);
        }

        self.rules
            .iter()
            .filter_map(|rule| {
                rule.pattern()
                    .literal_prefix_len(path)
                    .map(|len| (len, rule))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, rule)| rule)
    }

    /// Default decision, before overrides.
    pub fn default_allows(&self, path: &str, role: Role) -> bool {
        self.resolve(path)
            .map(|rule| rule.allows(role))
            .unwrap_or(false)
    }

    /// Rules whose default role set includes `role`, as menu/report entries.
    pub fn accessible_resources(&self, role: Role) -> Vec<ResourceEntry> {
        self.rules
            .iter()
            .filter(|rule| rule.allows(role))
            .map(|rule| ResourceEntry {
                path: rule.pattern().raw().to_string(),
                description: rule.description().to_string(),
            })
            .collect()
    }

    /// Rule ids grouped by description, in table order.
    ///
    /// Descriptions repeat across rules (list/new/edit rows of one catalog
    /// area share a label), so anything presenting a functionality matrix to
    /// a user must group by description first.
    pub fn functionalities(&self) -> Vec<(String, Vec<RuleId>)> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<RuleId>> = HashMap::new();

        for rule in &self.rules {
            let entry = groups.entry(rule.description().to_string());
            entry
                .or_insert_with(|| {
                    order.push(rule.description().to_string());
                    Vec::new()
                })
                .push(rule.id().clone());
        }

        order
            .into_iter()
            .map(|description| {
                let ids = groups.remove(&description).unwrap_or_default();
                (description, ids)
            })
            .collect()
    }
}

/// The dealership's default rule table.
///
/// Catalog list pages are visible to every role; create/edit pages require
/// Registrar; user administration and permission settings are
/// administrator-only. Unregistered sub-paths inherit from their nearest
/// registered ancestor through prefix resolution.
pub fn default_matrix() -> Result<PermissionMatrix, MatrixError> {
    use Role::{Administrator as A, Registrar as R, User as U};

    let rows: Vec<(RuleId, &'static str, Vec<Role>, &'static str)> = vec![
        (RuleId::new("home"), "/", vec![A, R, U], "Home dashboard"),
        (RuleId::new("brands_list"), "/brands", vec![A, R, U], "Brand catalog"),
        (RuleId::new("brands_new"), "/brands/new", vec![A, R], "Maintain brands"),
        (RuleId::new("brands_edit"), "/brands/:id/edit", vec![A, R], "Maintain brands"),
        (RuleId::new("models_list"), "/models", vec![A, R, U], "Model catalog"),
        (RuleId::new("models_new"), "/models/new", vec![A, R], "Maintain models"),
        (RuleId::new("models_edit"), "/models/:id/edit", vec![A, R], "Maintain models"),
        (RuleId::new("versions_list"), "/versions", vec![A, R, U], "Version catalog"),
        (RuleId::new("versions_new"), "/versions/new", vec![A, R], "Maintain versions"),
        (RuleId::new("versions_edit"), "/versions/:id/edit", vec![A, R], "Maintain versions"),
        (RuleId::new("colors_list"), "/colors", vec![A, R, U], "Color catalog"),
        (RuleId::new("colors_new"), "/colors/new", vec![A, R], "Maintain colors"),
        (RuleId::new("colors_edit"), "/colors/:id/edit", vec![A, R], "Maintain colors"),
        (RuleId::new("paint_types_list"), "/paint-types", vec![A, R, U], "Paint type catalog"),
        (RuleId::new("paint_types_new"), "/paint-types/new", vec![A, R], "Maintain paint types"),
        (RuleId::new("paint_types_edit"), "/paint-types/:id/edit", vec![A, R], "Maintain paint types"),
        (RuleId::new("optionals_list"), "/optionals", vec![A, R, U], "Optional equipment catalog"),
        (RuleId::new("optionals_new"), "/optionals/new", vec![A, R], "Maintain optional equipment"),
        (RuleId::new("optionals_edit"), "/optionals/:id/edit", vec![A, R], "Maintain optional equipment"),
        (RuleId::new("configurator"), "/configurator", vec![A, R, U], "Vehicle configurator"),
        (RuleId::new("configurator_version"), "/configurator/:version", vec![A, R, U], "Vehicle configurator"),
        (RuleId::new("users"), "/users", vec![A], "User accounts"),
        (RuleId::new("permission_settings"), "/settings/permissions", vec![A], "Permission settings"),
    ];

    PermissionMatrix::build(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> PermissionMatrix {
        default_matrix().unwrap()
    }

    #[test]
    fn default_matrix_builds() {
        let m = matrix();
        assert!(m.rules().len() > 20);
    }

    #[test]
    fn exact_match_wins() {
        let m = matrix();
        let rule = m.resolve("/brands/new").unwrap();
        assert_eq!(rule.id().as_str(), "brands_new");
    }

    #[test]
    fn parameterized_match_beats_prefix() {
        let m = matrix();
        // "/brands/:id/edit" matches; the "/brands" prefix must not win.
        let rule = m.resolve("/brands/42/edit").unwrap();
        assert_eq!(rule.id().as_str(), "brands_edit");
    }

    #[test]
    fn unregistered_subpath_inherits_longest_prefix() {
        let m = matrix();
        let rule = m.resolve("/models/something-else").unwrap();
        assert_eq!(rule.id().as_str(), "models_list");

        // Deeper nesting still resolves to the nearest registered ancestor.
        let rule = m.resolve("/brands/42/photos/3").unwrap();
        assert_eq!(rule.id().as_str(), "brands_list");
    }

    #[test]
    fn unknown_path_denies_for_every_role() {
        let m = matrix();
        assert!(m.resolve("/nowhere").is_none());
        assert!(!m.default_allows("/nowhere", Role::Administrator));
        assert!(!m.default_allows("/nowhere", Role::User));
    }

    #[test]
    fn root_resolves_to_home_only() {
        let m = matrix();
        assert_eq!(m.resolve("/").unwrap().id().as_str(), "home");
        // The root rule must not swallow unregistered paths via prefixing.
        assert!(m.resolve("/nowhere").is_none());
    }

    #[test]
    fn write_paths_require_registrar() {
        let m = matrix();
        assert!(m.default_allows("/versions/new", Role::Registrar));
        assert!(m.default_allows("/versions/new", Role::Administrator));
        assert!(!m.default_allows("/versions/new", Role::User));
    }

    #[test]
    fn list_paths_visible_to_all_roles() {
        let m = matrix();
        for role in [Role::Administrator, Role::Registrar, Role::User] {
            assert!(m.default_allows("/versions", role), "{role}");
        }
    }

    #[test]
    fn admin_only_paths_hidden_from_other_roles() {
        let m = matrix();
        assert!(m.default_allows("/settings/permissions", Role::Administrator));
        assert!(!m.default_allows("/settings/permissions", Role::Registrar));
        assert!(!m.default_allows("/settings/permissions", Role::User));
    }

    #[test]
    fn accessible_resources_filters_by_role() {
        let m = matrix();
        let user_paths: Vec<_> = m
            .accessible_resources(Role::User)
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert!(user_paths.contains(&"/brands".to_string()));
        assert!(!user_paths.contains(&"/brands/new".to_string()));
        assert!(!user_paths.contains(&"/users".to_string()));
    }

    #[test]
    fn functionalities_deduplicate_descriptions() {
        let m = matrix();
        let groups = m.functionalities();

        let brands = groups
            .iter()
            .find(|(description, _)| description == "Maintain brands")
            .unwrap();
        assert_eq!(brands.1.len(), 2);

        let descriptions: Vec<_> = groups.iter().map(|(d, _)| d.clone()).collect();
        let mut deduped = descriptions.clone();
        deduped.dedup();
        assert_eq!(descriptions, deduped, "descriptions must appear once");
    }

    #[test]
    fn build_rejects_malformed_pattern() {
        let rows = vec![(
            RuleId::new("broken"),
            "/brands/:/edit",
            vec![Role::Administrator],
            "Broken",
        )];
        assert!(matches!(
            PermissionMatrix::build(rows),
            Err(MatrixError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn build_rejects_duplicate_rule_ids() {
        let rows = vec![
            (RuleId::new("dup"), "/a", vec![Role::User], "A"),
            (RuleId::new("dup"), "/b", vec![Role::User], "B"),
        ];
        assert!(matches!(
            PermissionMatrix::build(rows),
            Err(MatrixError::DuplicateRuleId(_))
        ));
    }
}
