//! Builder configuration.
//!
//! [`BuilderConfig`] holds the defaults a [`FragmentBuilder`](crate::FragmentBuilder)
//! falls back to when a comparison does not name them.

use crate::clause::ClauseKind;
use crate::sanitize::SanitizerKind;
use crate::value::Joiner;
use serde::{Deserialize, Serialize};

/// Text placed between whole fragments when a clause is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentSeparator {
    /// A single space. Fragments must carry their own boolean keywords.
    #[default]
    Space,
    /// ` AND `
    And,
    /// ` OR `
    Or,
}

impl FragmentSeparator {
    pub fn as_sql(self) -> &'static str {
        match self {
            FragmentSeparator::Space => " ",
            FragmentSeparator::And => " AND ",
            FragmentSeparator::Or => " OR ",
        }
    }
}

/// Defaults applied by [`FragmentBuilder`](crate::FragmentBuilder).
///
/// Deserializable, so hosts can keep it next to the rest of their settings:
///
/// ```ignore
/// let config: BuilderConfig = serde_json::from_str(r#"{ "fragment_separator": "and" }"#)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Sanitizer used by comparisons that do not name one. Default `int`.
    pub default_sanitizer: SanitizerKind,
    /// Joiner for multi-value scalar comparisons. Default `OR`.
    pub default_joiner: Joiner,
    /// Clause targeted when a comparison runs with no clause selected.
    pub default_clause: ClauseKind,
    /// Separator between fragments at assembly time. Default a single space.
    pub fragment_separator: FragmentSeparator,
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sanitizer used when a comparison does not name one.
    pub fn with_default_sanitizer(mut self, kind: SanitizerKind) -> Self {
        self.default_sanitizer = kind;
        self
    }

    /// Set the joiner used for multi-value comparisons.
    pub fn with_default_joiner(mut self, joiner: Joiner) -> Self {
        self.default_joiner = joiner;
        self
    }

    /// Set the clause comparisons fall back to when none is selected.
    pub fn with_default_clause(mut self, clause: ClauseKind) -> Self {
        self.default_clause = clause;
        self
    }

    /// Set the separator inserted between fragments at assembly.
    pub fn with_fragment_separator(mut self, separator: FragmentSeparator) -> Self {
        self.fragment_separator = separator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BuilderConfig::new();
        assert_eq!(config.default_sanitizer, SanitizerKind::Integer);
        assert_eq!(config.default_joiner, Joiner::Or);
        assert_eq!(config.default_clause, ClauseKind::Where);
        assert_eq!(config.fragment_separator, FragmentSeparator::Space);
    }

    #[test]
    fn deserialize_partial_json() {
        let config: BuilderConfig = serde_json::from_str(
            r#"{ "default_sanitizer": "double", "fragment_separator": "and", "default_joiner": "AND" }"#,
        )
        .unwrap();
        assert_eq!(config.default_sanitizer, SanitizerKind::Float);
        assert_eq!(config.default_joiner, Joiner::And);
        assert_eq!(config.default_clause, ClauseKind::Where);
        assert_eq!(config.fragment_separator.as_sql(), " AND ");
    }

    #[test]
    fn serialize_uses_shorthand_names() {
        let config = BuilderConfig::new().with_default_clause(ClauseKind::OrderBy);
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["default_sanitizer"], "int");
        assert_eq!(json["default_clause"], "orderby");
        assert_eq!(json["default_joiner"], "OR");
        assert_eq!(json["fragment_separator"], "space");
    }

    #[test]
    fn unknown_clause_is_rejected() {
        let result = serde_json::from_str::<BuilderConfig>(r#"{ "default_clause": "having" }"#);
        assert!(result.is_err());
    }
}
