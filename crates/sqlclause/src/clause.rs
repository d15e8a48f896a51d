//! Clause selection state and per-clause fragment storage.
//!
//! [`ClauseState`] tracks which clause and field the builder is currently
//! describing. [`FragmentAccumulator`] keeps the finished fragments of every
//! clause until they are assembled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named section of a SQL statement that fragments can be collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseKind {
    Select,
    #[default]
    Where,
    Join,
    OrderBy,
    Order,
    Count,
}

impl ClauseKind {
    /// All clause kinds, in declaration order.
    pub const ALL: [ClauseKind; 6] = [
        ClauseKind::Select,
        ClauseKind::Where,
        ClauseKind::Join,
        ClauseKind::OrderBy,
        ClauseKind::Order,
        ClauseKind::Count,
    ];

    /// Parse a clause name, ignoring ASCII case and surrounding whitespace.
    ///
    /// Returns `None` for names outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// The lowercase clause name (`"where"`, `"orderby"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ClauseKind::Select => "select",
            ClauseKind::Where => "where",
            ClauseKind::Join => "join",
            ClauseKind::OrderBy => "orderby",
            ClauseKind::Order => "order",
            ClauseKind::Count => "count",
        }
    }

    /// The SQL keyword that prefixes an assembled clause.
    pub fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Select => "SELECT",
            ClauseKind::Where => "WHERE",
            ClauseKind::Join => "JOIN",
            ClauseKind::OrderBy => "ORDER BY",
            ClauseKind::Order => "ORDER",
            ClauseKind::Count => "COUNT",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The clause and field currently being described.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseState {
    clause: Option<ClauseKind>,
    field: Option<String>,
}

impl ClauseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clause by name.
    ///
    /// Unknown names leave the current clause unchanged. Returns whether the
    /// selection was applied.
    pub fn select_clause(&mut self, name: &str) -> bool {
        match ClauseKind::parse(name) {
            Some(kind) => {
                self.clause = Some(kind);
                true
            }
            None => false,
        }
    }

    /// Select a clause directly.
    pub fn set_clause(&mut self, kind: ClauseKind) {
        self.clause = Some(kind);
    }

    /// Set the current field. The name must already be normalized.
    pub fn set_field(&mut self, field: impl Into<String>) {
        self.field = Some(field.into());
    }

    /// Clear both the current clause and the current field.
    pub fn reset(&mut self) {
        self.clause = None;
        self.field = None;
    }

    pub fn clause(&self) -> Option<ClauseKind> {
        self.clause
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// A read-only view handed to operator and sanitizer filters.
    pub fn context(&self) -> FilterContext<'_> {
        FilterContext {
            clause: self.clause,
            field: self.field(),
        }
    }
}

/// Snapshot of the builder state passed to override filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterContext<'a> {
    /// Clause currently selected, if any.
    pub clause: Option<ClauseKind>,
    /// Field currently selected, if any.
    pub field: Option<&'a str>,
}

/// Finished fragments, grouped by clause in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FragmentAccumulator {
    buckets: HashMap<ClauseKind, Vec<String>>,
}

impl FragmentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to the end of `clause`'s sequence.
    pub fn append(&mut self, clause: ClauseKind, fragment: impl Into<String>) {
        self.buckets.entry(clause).or_default().push(fragment.into());
    }

    /// Fragments stored for `clause`, oldest first. Nothing is removed.
    pub fn drain(&self, clause: ClauseKind) -> &[String] {
        self.buckets.get(&clause).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Discard every fragment stored for `clause`.
    pub fn clear(&mut self, clause: ClauseKind) {
        self.buckets.remove(&clause);
    }

    /// Discard the fragments of every clause.
    pub fn clear_all(&mut self) {
        self.buckets.clear();
    }

    /// Number of fragments stored for `clause`.
    pub fn len(&self, clause: ClauseKind) -> usize {
        self.drain(clause).len()
    }

    /// Whether no clause holds any fragment.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_parse_is_case_insensitive() {
        assert_eq!(ClauseKind::parse("WHERE"), Some(ClauseKind::Where));
        assert_eq!(ClauseKind::parse("OrderBy"), Some(ClauseKind::OrderBy));
        assert_eq!(ClauseKind::parse(" count "), Some(ClauseKind::Count));
    }

    #[test]
    fn clause_parse_rejects_unknown() {
        assert_eq!(ClauseKind::parse("having"), None);
        assert_eq!(ClauseKind::parse("order by"), None);
        assert_eq!(ClauseKind::parse(""), None);
    }

    #[test]
    fn clause_keywords() {
        assert_eq!(ClauseKind::Where.keyword(), "WHERE");
        assert_eq!(ClauseKind::OrderBy.keyword(), "ORDER BY");
        assert_eq!(ClauseKind::Count.to_string(), "count");
    }

    #[test]
    fn unknown_clause_selection_is_noop() {
        let mut state = ClauseState::new();
        assert!(state.select_clause("join"));
        assert!(!state.select_clause("groupby"));
        assert_eq!(state.clause(), Some(ClauseKind::Join));
    }

    #[test]
    fn selection_overwrites() {
        let mut state = ClauseState::new();
        state.set_field("id");
        state.set_field("age");
        state.set_clause(ClauseKind::Where);
        state.set_clause(ClauseKind::Select);
        assert_eq!(state.field(), Some("age"));
        assert_eq!(state.clause(), Some(ClauseKind::Select));
    }

    #[test]
    fn reset_clears_clause_and_field() {
        let mut state = ClauseState::new();
        state.set_clause(ClauseKind::Where);
        state.set_field("id");
        state.reset();
        assert_eq!(state, ClauseState::new());
        assert_eq!(state.context(), FilterContext::default());
    }

    #[test]
    fn accumulator_keeps_order_per_clause() {
        let mut acc = FragmentAccumulator::new();
        acc.append(ClauseKind::Where, "a = 1");
        acc.append(ClauseKind::Join, "b = 2");
        acc.append(ClauseKind::Where, "c = 3");
        assert_eq!(acc.drain(ClauseKind::Where), ["a = 1", "c = 3"]);
        assert_eq!(acc.drain(ClauseKind::Join), ["b = 2"]);
        assert!(acc.drain(ClauseKind::Select).is_empty());
    }

    #[test]
    fn accumulator_drain_does_not_remove() {
        let mut acc = FragmentAccumulator::new();
        acc.append(ClauseKind::Where, "a = 1");
        let _ = acc.drain(ClauseKind::Where);
        assert_eq!(acc.len(ClauseKind::Where), 1);
        acc.clear(ClauseKind::Where);
        assert!(acc.is_empty());
    }
}
