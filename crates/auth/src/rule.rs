//! Permission rules and their compiled route patterns.
//!
//! Patterns are compiled once when the matrix is built, into typed segments,
//! rather than re-interpreted per lookup. Matching always compares whole
//! `/`-delimited segments; `/models` is never treated as a prefix of
//! `/modelships`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::Role;

/// Stable identifier for a permission rule.
///
/// This is the join key between the compiled matrix and the override store.
/// The human-readable description is display-only and may repeat across
/// rules; rule ids never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(Cow<'static, str>);

impl RuleId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RuleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("pattern has an empty segment: {0}")]
    EmptySegment(String),

    #[error("parameter segment is missing a name: {0}")]
    UnnamedParam(String),
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route pattern compiled from a string like `/brands/:id/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: Cow<'static, str>,
    segments: Vec<Segment>,
    has_params: bool,
}

impl RoutePattern {
    /// Compile a pattern string. Malformed patterns are a programming error
    /// in the static rule table; the matrix builder fails fast on them.
    pub fn compile(pattern: impl Into<Cow<'static, str>>) -> Result<Self, PatternError> {
        let raw: Cow<'static, str> = pattern.into();

        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.into_owned()));
        }

        let mut segments = Vec::new();
        let mut has_params = false;

        // "/" compiles to zero segments and only ever matches itself.
        let trimmed = raw.trim_start_matches('/').trim_end_matches('/');
        if !trimmed.is_empty() {
            for part in trimmed.split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.clone().into_owned()));
                }
                if let Some(name) = part.strip_prefix(':') {
                    if name.is_empty() {
                        return Err(PatternError::UnnamedParam(raw.clone().into_owned()));
                    }
                    has_params = true;
                    segments.push(Segment::Param(name.to_string()));
                } else {
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }

        Ok(Self {
            raw,
            segments,
            has_params,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn has_params(&self) -> bool {
        self.has_params
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Full match: same segment count, literals equal, parameters accept any
    /// non-empty segment value.
    pub fn matches(&self, path: &str) -> bool {
        let parts = split_path(path);
        if parts.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(parts)
            .all(|(segment, part)| match segment {
                Segment::Literal(lit) => lit == part,
                Segment::Param(_) => !part.is_empty(),
            })
    }

    /// Segment-boundary prefix match for non-parameterized patterns.
    ///
    /// Returns the raw pattern length for longest-prefix selection, or `None`
    /// when this pattern is parameterized, is the bare root, or does not
    /// cover a leading whole-segment run of `path`.
    pub fn literal_prefix_len(&self, path: &str) -> Option<usize> {
        if self.has_params || self.segments.is_empty() {
            return None;
        }

        let parts = split_path(path);
        if parts.len() < self.segments.len() {
            return None;
        }

        let covered = self
            .segments
            .iter()
            .zip(&parts)
            .all(|(segment, part)| match segment {
                Segment::Literal(lit) => lit == *part,
                Segment::Param(_) => false,
            });

        covered.then_some(self.raw.len())
    }
}

impl core::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a request path into its non-empty segments.
///
/// Trailing slashes are insignificant: `/brands/` and `/brands` resolve to
/// the same rule.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// One row of the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRule {
    id: RuleId,
    pattern: RoutePattern,
    allowed: Vec<Role>,
    description: Cow<'static, str>,
}

impl PermissionRule {
    pub fn new(
        id: RuleId,
        pattern: RoutePattern,
        allowed: Vec<Role>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            id,
            pattern,
            allowed,
            description: description.into(),
        }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed
    }

    /// Default grant for `role`. Administrator is allowed regardless of the
    /// rule's role set; the role data can widen access but never narrow the
    /// administrator's.
    pub fn allows(&self, role: Role) -> bool {
        role.is_administrator() || self.allowed.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(raw: &'static str) -> RoutePattern {
        RoutePattern::compile(raw).unwrap()
    }

    #[test]
    fn compiles_literal_and_param_segments() {
        let p = pattern("/brands/:id/edit");
        assert!(p.has_params());
        assert_eq!(p.segment_count(), 3);
        assert_eq!(p.raw(), "/brands/:id/edit");
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert_eq!(
            RoutePattern::compile("brands"),
            Err(PatternError::MissingLeadingSlash("brands".into()))
        );
        assert_eq!(
            RoutePattern::compile("/brands//edit"),
            Err(PatternError::EmptySegment("/brands//edit".into()))
        );
        assert_eq!(
            RoutePattern::compile("/brands/:/edit"),
            Err(PatternError::UnnamedParam("/brands/:/edit".into()))
        );
    }

    #[test]
    fn param_segments_match_any_value() {
        let p = pattern("/brands/:id/edit");
        assert!(p.matches("/brands/42/edit"));
        assert!(p.matches("/brands/9b2f/edit"));
        assert!(!p.matches("/brands/42"));
        assert!(!p.matches("/models/42/edit"));
    }

    #[test]
    fn matching_ignores_trailing_slash() {
        let p = pattern("/brands");
        assert!(p.matches("/brands/"));
        assert!(p.matches("/brands"));
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let p = pattern("/models");
        assert_eq!(p.literal_prefix_len("/models/anything"), Some(7));
        assert_eq!(p.literal_prefix_len("/models"), Some(7));
        // Not a raw substring match.
        assert_eq!(p.literal_prefix_len("/modelships"), None);
        assert_eq!(p.literal_prefix_len("/m"), None);
    }

    #[test]
    fn root_pattern_never_prefix_matches() {
        let root = pattern("/");
        assert!(root.matches("/"));
        assert!(!root.matches("/brands"));
        assert_eq!(root.literal_prefix_len("/brands"), None);
    }

    #[test]
    fn parameterized_patterns_never_prefix_match() {
        let p = pattern("/brands/:id");
        assert_eq!(p.literal_prefix_len("/brands/42/photos"), None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: a parameterized rule matches every substituted id.
            #[test]
            fn param_rule_matches_any_substituted_id(id in "[A-Za-z0-9_-]{1,24}") {
                let p = pattern("/brands/:id/edit");
                let path = format!("/brands/{}/edit", id);
                prop_assert!(p.matches(&path));
            }

            /// Property: literal prefixing only fires on whole segments.
            #[test]
            fn prefix_never_matches_inside_a_segment(suffix in "[a-z]{1,12}") {
                let p = pattern("/models");
                let glued = format!("/models{suffix}");
                prop_assert_eq!(p.literal_prefix_len(&glued), None);

                let nested = format!("/models/{suffix}");
                prop_assert_eq!(p.literal_prefix_len(&nested), Some("/models".len()));
            }
        }
    }
}
