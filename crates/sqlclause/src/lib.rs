//! # sqlclause
//!
//! A stateful, sanitizing SQL clause fragment builder.
//!
//! ## Features
//!
//! - **Fluent comparisons**: select a field, then call `equals`, `gt`, `in_`, `between`, ...
//! - **Always sanitized**: every value passes through exactly one sanitizer
//! - **Shorthand sanitizers**: `int`, `float`, `string`, `key`, or any closure
//! - **Closed operator whitelist**: 14 comparison forms, overridable by an injected filter
//! - **Per-clause accumulation**: WHERE, JOIN, SELECT, ORDER BY, ORDER, COUNT
//! - **No connection**: the output is plain text for the caller to splice and execute
//!
//! ## Builder
//!
//! ```ignore
//! use sqlclause::{FragmentBuilder, Joiner, Operator};
//!
//! let mut qb = FragmentBuilder::new();
//!
//! // WHERE status IN ('a', 'b') age > 18
//! qb.where_field("status").in_with(["a", "b"], "string")?;
//! qb.select_field("age").gt(18)?;
//! let sql = qb.assemble();
//!
//! // WHERE (age != 5 AND age != 65)
//! qb.where_field("age")
//!     .compare_with(Operator::Neq, [5, 65], "int", Joiner::And)?;
//! let sql = qb.assemble();
//! ```
//!
//! ## Overrides
//!
//! Hosts can widen or narrow the operator whitelist and replace sanitizers
//! without touching the builder:
//!
//! ```ignore
//! let qb = FragmentBuilder::new()
//!     .with_host_sanitizers(MyHost)
//!     .with_operator_filter(|allowed, op, _ctx| allowed || op == "ILIKE")
//!     .with_sanitizer_filter(|transform, _sanitizer, _ctx| transform);
//! ```

pub mod builder;
pub mod clause;
pub mod config;
pub mod error;
pub mod operator;
pub mod sanitize;
pub mod value;

pub use builder::FragmentBuilder;
pub use clause::{ClauseKind, ClauseState, FilterContext, FragmentAccumulator};
pub use config::{BuilderConfig, FragmentSeparator};
pub use error::{ClauseError, ClauseResult};
pub use operator::{
    NoopOperatorFilter, Operator, OperatorFamily, OperatorFilter, OperatorSymbol,
    OperatorWhitelist,
};
pub use sanitize::{
    DefaultSanitizers, HostSanitizers, NoopSanitizerFilter, Sanitizer, SanitizerFilter,
    SanitizerKind, SanitizerRegistry, Transform, resolve_sanitizer_or_default,
};
pub use value::{IntoValueSet, Joiner, RawValue};
