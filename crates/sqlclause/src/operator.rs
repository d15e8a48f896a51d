//! Comparison operators and the operator whitelist.
//!
//! [`Operator`] is the closed set of comparison forms the builder renders.
//! [`OperatorWhitelist`] validates caller-supplied operator symbols against
//! that set and lets an injected [`OperatorFilter`] widen or narrow it.

use crate::clause::FilterContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Equal: field = value
    Eq,
    /// Not equal: field != value
    Neq,
    /// Greater than: field > value
    Gt,
    /// Greater than or equal: field >= value
    Gte,
    /// Less than: field < value
    Lt,
    /// Less than or equal: field <= value
    Lte,
    /// LIKE pattern match
    Like,
    /// NOT LIKE pattern match
    NotLike,
    /// IN (list)
    In,
    /// NOT IN (list)
    NotIn,
    /// BETWEEN a AND b
    Between,
    /// NOT BETWEEN a AND b
    NotBetween,
    /// EXISTS (subquery)
    Exists,
    /// NOT EXISTS (subquery)
    NotExists,
}

/// How an operator shapes its fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    /// `field op value`, one term per value.
    Scalar,
    /// `field op (v1, v2, ...)`.
    Set,
    /// `field op v1 AND v2`, exactly two values.
    Range,
    /// `op (value)`, no field prefix.
    Existence,
}

impl Operator {
    /// Every built-in operator.
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::NotBetween,
        Operator::Exists,
        Operator::NotExists,
    ];

    /// The SQL text of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
        }
    }

    /// Look up a built-in operator by its exact SQL text (case-sensitive).
    pub fn from_sql(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_sql() == symbol)
    }

    pub fn family(self) -> OperatorFamily {
        match self {
            Operator::In | Operator::NotIn => OperatorFamily::Set,
            Operator::Between | Operator::NotBetween => OperatorFamily::Range,
            Operator::Exists | Operator::NotExists => OperatorFamily::Existence,
            _ => OperatorFamily::Scalar,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// An operator accepted by the whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorSymbol {
    /// One of the built-in operators.
    Builtin(Operator),
    /// A symbol outside the built-in set that a filter allowed.
    ///
    /// Rendered with the scalar shape, verbatim.
    Extended(String),
}

impl OperatorSymbol {
    pub fn as_sql(&self) -> &str {
        match self {
            OperatorSymbol::Builtin(op) => op.as_sql(),
            OperatorSymbol::Extended(symbol) => symbol,
        }
    }

    pub fn family(&self) -> OperatorFamily {
        match self {
            OperatorSymbol::Builtin(op) => op.family(),
            OperatorSymbol::Extended(_) => OperatorFamily::Scalar,
        }
    }
}

impl From<Operator> for OperatorSymbol {
    fn from(op: Operator) -> Self {
        OperatorSymbol::Builtin(op)
    }
}

/// Override hook for operator validation.
///
/// Receives the built-in verdict and may flip it.
///
/// Closures with the matching signature implement this trait.
pub trait OperatorFilter: Send + Sync {
    fn filter(&self, allowed: bool, op: &str, ctx: &FilterContext<'_>) -> bool;
}

impl<F> OperatorFilter for F
where
    F: Fn(bool, &str, &FilterContext<'_>) -> bool + Send + Sync,
{
    fn filter(&self, allowed: bool, op: &str, ctx: &FilterContext<'_>) -> bool {
        self(allowed, op, ctx)
    }
}

/// A filter that leaves every verdict untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOperatorFilter;

impl OperatorFilter for NoopOperatorFilter {
    fn filter(&self, allowed: bool, _op: &str, _ctx: &FilterContext<'_>) -> bool {
        allowed
    }
}

/// Validates operator symbols against the built-in set plus a filter.
#[derive(Clone)]
pub struct OperatorWhitelist {
    filter: Arc<dyn OperatorFilter>,
}

impl Default for OperatorWhitelist {
    fn default() -> Self {
        Self::new(Arc::new(NoopOperatorFilter))
    }
}

impl fmt::Debug for OperatorWhitelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorWhitelist")
            .field("filter", &"<dyn OperatorFilter>")
            .finish()
    }
}

impl OperatorWhitelist {
    pub fn new(filter: Arc<dyn OperatorFilter>) -> Self {
        Self { filter }
    }

    /// Whether `op` is a permitted comparison symbol.
    pub fn is_allowed(&self, op: &str, ctx: &FilterContext<'_>) -> bool {
        let allowed = Operator::from_sql(op).is_some();
        self.filter.filter(allowed, op, ctx)
    }

    /// Accept `op` if permitted, otherwise fall back to `=`.
    pub fn resolve_operator_or_default(&self, op: &str, ctx: &FilterContext<'_>) -> OperatorSymbol {
        if !self.is_allowed(op, ctx) {
            tracing::debug!(
                target: "sqlclause.fragment",
                op,
                "operator rejected, falling back to `=`"
            );
            return OperatorSymbol::Builtin(Operator::Eq);
        }
        match Operator::from_sql(op) {
            Some(builtin) => OperatorSymbol::Builtin(builtin),
            None => OperatorSymbol::Extended(op.to_string()),
        }
    }
}
