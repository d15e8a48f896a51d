//! Stateful clause fragment builder.
//!
//! [`FragmentBuilder`] owns the whole conversation: the current clause and
//! field, the fragments collected per clause, the operator whitelist and the
//! sanitizer registry.
//!
//! ## Design
//!
//! - One builder per query-building session; it is never shared.
//! - Every comparison method runs the same pipeline:
//!   arity check → sanitizer resolution → sanitize each value → render → append.
//! - Lenient inputs (unknown clause, rejected operator, unknown sanitizer)
//!   fall back silently; missing field and bad arity are errors.
//!
//! # Example
//! ```ignore
//! use sqlclause::FragmentBuilder;
//!
//! let mut qb = FragmentBuilder::new();
//! qb.where_field("status").in_with(["a", "b"], "string")?;
//! qb.select_field("age").gt(18)?;
//! assert_eq!(qb.assemble(), "WHERE status IN ('a', 'b') age > 18");
//! # Ok::<(), sqlclause::ClauseError>(())
//! ```

mod render;

use crate::clause::{ClauseKind, ClauseState, FilterContext, FragmentAccumulator};
use crate::config::BuilderConfig;
use crate::error::{ClauseError, ClauseResult};
use crate::operator::{Operator, OperatorFamily, OperatorFilter, OperatorSymbol, OperatorWhitelist};
use crate::sanitize::{HostSanitizers, Sanitizer, SanitizerFilter, SanitizerRegistry, Transform};
use crate::value::{IntoValueSet, Joiner};
use std::sync::Arc;

/// Defines `name(values)`, `name_with(values, sanitizer)` and
/// `name_with_joiner(values, sanitizer, joiner)` for one operator.
macro_rules! comparison_methods {
    ($( $(#[$doc:meta])* $name:ident, $name_with:ident, $name_with_joiner:ident => $op:expr; )*) => {
        $(
            $(#[$doc])*
            pub fn $name<V: IntoValueSet>(&mut self, values: V) -> ClauseResult<&mut Self> {
                let sanitizer = Sanitizer::Kind(self.config.default_sanitizer);
                let joiner = self.config.default_joiner;
                self.push(OperatorSymbol::Builtin($op), values, sanitizer, joiner)
            }

            #[doc = concat!("Like [`", stringify!($name), "`](Self::", stringify!($name), "), with an explicit sanitizer.")]
            pub fn $name_with<V: IntoValueSet>(
                &mut self,
                values: V,
                sanitizer: impl Into<Sanitizer>,
            ) -> ClauseResult<&mut Self> {
                let joiner = self.config.default_joiner;
                self.push(OperatorSymbol::Builtin($op), values, sanitizer.into(), joiner)
            }

            #[doc = concat!("Like [`", stringify!($name), "`](Self::", stringify!($name), "), with an explicit sanitizer and joiner.")]
            pub fn $name_with_joiner<V: IntoValueSet>(
                &mut self,
                values: V,
                sanitizer: impl Into<Sanitizer>,
                joiner: Joiner,
            ) -> ClauseResult<&mut Self> {
                self.push(OperatorSymbol::Builtin($op), values, sanitizer.into(), joiner)
            }
        )*
    };
}

/// Builds sanitized comparison fragments per clause and assembles them.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    config: BuilderConfig,
    state: ClauseState,
    fragments: FragmentAccumulator,
    operators: OperatorWhitelist,
    sanitizers: SanitizerRegistry,
}

impl FragmentBuilder {
    /// Create a builder with default configuration and sanitizers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the host sanitizers presets are built from.
    pub fn with_host_sanitizers(mut self, host: impl HostSanitizers + 'static) -> Self {
        self.sanitizers.set_host(Arc::new(host));
        self
    }

    /// Install an operator filter closure `(allowed, op, ctx) -> allowed`.
    pub fn with_operator_filter<F>(self, filter: F) -> Self
    where
        F: Fn(bool, &str, &FilterContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.with_operator_strategy(Arc::new(filter))
    }

    /// Install a shared operator filter.
    pub fn with_operator_strategy(mut self, filter: Arc<dyn OperatorFilter>) -> Self {
        self.operators = OperatorWhitelist::new(filter);
        self
    }

    /// Install a sanitizer filter closure `(transform, sanitizer, ctx) -> transform`.
    pub fn with_sanitizer_filter<F>(self, filter: F) -> Self
    where
        F: Fn(Transform, &Sanitizer, &FilterContext<'_>) -> Transform + Send + Sync + 'static,
    {
        self.with_sanitizer_strategy(Arc::new(filter))
    }

    /// Install a shared sanitizer filter.
    pub fn with_sanitizer_strategy(mut self, filter: Arc<dyn SanitizerFilter>) -> Self {
        self.sanitizers.set_filter(filter);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // ==================== Clause state ====================

    /// Select a clause by name (case-insensitive). Unknown names are ignored.
    pub fn select_clause(&mut self, name: &str) -> &mut Self {
        if !self.state.select_clause(name) {
            tracing::trace!(target: "sqlclause.fragment", name, "unknown clause ignored");
        }
        self
    }

    /// Select a clause.
    pub fn clause(&mut self, kind: ClauseKind) -> &mut Self {
        self.state.set_clause(kind);
        self
    }

    /// Select the field following comparisons apply to.
    ///
    /// The name is normalized by the host identifier sanitizer. The current
    /// clause is left as is.
    pub fn select_field(&mut self, name: &str) -> &mut Self {
        let field = self.sanitizers.host().sanitize_identifier(name);
        tracing::trace!(target: "sqlclause.fragment", raw = name, field = %field, "field selected");
        self.state.set_field(field);
        self
    }

    /// Select `name` as the current field of the WHERE clause.
    pub fn where_field(&mut self, name: &str) -> &mut Self {
        self.clause(ClauseKind::Where).select_field(name)
    }

    /// Select both a clause and a field.
    pub fn clause_field(&mut self, kind: ClauseKind, name: &str) -> &mut Self {
        self.clause(kind).select_field(name)
    }

    /// Clear the current clause and field. Collected fragments are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.state.reset();
        self
    }

    /// Clear the current clause and field and discard every fragment.
    pub fn clear(&mut self) -> &mut Self {
        self.state.reset();
        self.fragments.clear_all();
        self
    }

    pub fn current_clause(&self) -> Option<ClauseKind> {
        self.state.clause()
    }

    pub fn current_field(&self) -> Option<&str> {
        self.state.field()
    }

    /// Fragments collected so far for `kind`.
    pub fn fragments(&self, kind: ClauseKind) -> &[String] {
        self.fragments.drain(kind)
    }

    /// Whether `op` passes the operator whitelist in the current state.
    pub fn is_allowed(&self, op: &str) -> bool {
        self.operators.is_allowed(op, &self.state.context())
    }

    /// Resolve a sanitizer the same way comparisons do.
    pub fn resolve_sanitizer(&self, sanitizer: impl Into<Sanitizer>) -> Transform {
        self.sanitizers
            .resolve(&sanitizer.into(), &self.state.context())
    }

    // ==================== Comparisons ====================

    comparison_methods! {
        /// `field = value`
        equals, equals_with, equals_with_joiner => Operator::Eq;
        /// `field != value`
        not_equals, not_equals_with, not_equals_with_joiner => Operator::Neq;
        /// `field > value`
        gt, gt_with, gt_with_joiner => Operator::Gt;
        /// `field >= value`
        gte, gte_with, gte_with_joiner => Operator::Gte;
        /// `field < value`
        lt, lt_with, lt_with_joiner => Operator::Lt;
        /// `field <= value`
        lte, lte_with, lte_with_joiner => Operator::Lte;
        /// `field LIKE pattern`
        like, like_with, like_with_joiner => Operator::Like;
        /// `field NOT LIKE pattern`
        not_like, not_like_with, not_like_with_joiner => Operator::NotLike;
        /// `field IN (v1, v2, ...)`
        in_, in_with, in_with_joiner => Operator::In;
        /// `field NOT IN (v1, v2, ...)`
        not_in, not_in_with, not_in_with_joiner => Operator::NotIn;
        /// `field BETWEEN from AND to`; exactly two values.
        between, between_with, between_with_joiner => Operator::Between;
        /// `field NOT BETWEEN from AND to`; exactly two values.
        not_between, not_between_with, not_between_with_joiner => Operator::NotBetween;
        /// `EXISTS (value)`; no field is required.
        exists, exists_with, exists_with_joiner => Operator::Exists;
        /// `NOT EXISTS (value)`; no field is required.
        not_exists, not_exists_with, not_exists_with_joiner => Operator::NotExists;
    }

    /// Compare with a built-in operator, naming every option.
    pub fn compare_with<V: IntoValueSet>(
        &mut self,
        op: Operator,
        values: V,
        sanitizer: impl Into<Sanitizer>,
        joiner: Joiner,
    ) -> ClauseResult<&mut Self> {
        self.push(OperatorSymbol::Builtin(op), values, sanitizer.into(), joiner)
    }

    /// Compare with a caller-supplied operator symbol.
    ///
    /// The symbol is checked against the whitelist; a rejected symbol
    /// becomes `=`.
    pub fn compare<V: IntoValueSet>(
        &mut self,
        op: &str,
        values: V,
        sanitizer: impl Into<Sanitizer>,
        joiner: Joiner,
    ) -> ClauseResult<&mut Self> {
        let op = self
            .operators
            .resolve_operator_or_default(op, &self.state.context());
        self.push(op, values, sanitizer.into(), joiner)
    }

    /// Select `field` on the WHERE clause and compare it in one call.
    pub fn where_compare<V: IntoValueSet>(
        &mut self,
        field: &str,
        op: Operator,
        values: V,
        sanitizer: impl Into<Sanitizer>,
    ) -> ClauseResult<&mut Self> {
        let joiner = self.config.default_joiner;
        self.where_field(field)
            .push(OperatorSymbol::Builtin(op), values, sanitizer.into(), joiner)
    }

    fn push<V: IntoValueSet>(
        &mut self,
        op: OperatorSymbol,
        values: V,
        sanitizer: Sanitizer,
        joiner: Joiner,
    ) -> ClauseResult<&mut Self> {
        let clause = self.state.clause().unwrap_or(self.config.default_clause);
        let field = self.state.field().filter(|f| !f.is_empty());
        if field.is_none() && op.family() != OperatorFamily::Existence {
            return Err(ClauseError::invalid_state(format!(
                "no field selected for `{}`",
                op.as_sql()
            )));
        }

        let values = values.into_value_set();
        render::check_arity(&op, values.len())?;

        let transform = self.sanitizers.resolve(&sanitizer, &self.state.context());
        let sanitized: Vec<String> = values
            .iter()
            .map(|value| transform.apply(value.as_str()))
            .collect();
        let fragment = render::render(field.unwrap_or_default(), &op, &sanitized, joiner);

        tracing::debug!(
            target: "sqlclause.fragment",
            clause = %clause,
            op = op.as_sql(),
            values = sanitized.len(),
            fragment = %fragment,
            "fragment appended"
        );
        self.state.set_clause(clause);
        self.fragments.append(clause, fragment);
        Ok(self)
    }

    // ==================== Assembly ====================

    /// Assemble the current clause into `"<KEYWORD> <fragments>"`.
    ///
    /// Returns an empty string, changing nothing, when the current clause has
    /// no fragments. Otherwise the current clause and field are reset; the
    /// stored fragments stay, so selecting the clause again and assembling
    /// yields the same text.
    pub fn assemble(&mut self) -> String {
        let Some(clause) = self.state.clause() else {
            return String::new();
        };
        let fragments = self.fragments.drain(clause);
        if fragments.is_empty() {
            return String::new();
        }

        let sql = format!(
            "{} {}",
            clause.keyword(),
            fragments.join(self.config.fragment_separator.as_sql())
        );
        tracing::trace!(target: "sqlclause.fragment", clause = %clause, sql = %sql, "clause assembled");
        self.state.reset();
        sql
    }

    /// Select `kind` and assemble it.
    pub fn assemble_clause(&mut self, kind: ClauseKind) -> String {
        self.clause(kind).assemble()
    }

    /// Assemble `kind` and discard its fragments.
    pub fn take_clause(&mut self, kind: ClauseKind) -> String {
        let sql = self.assemble_clause(kind);
        self.fragments.clear(kind);
        sql
    }
}
