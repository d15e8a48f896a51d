//! Value sanitizers and the shorthand registry.
//!
//! Every value that reaches a fragment is passed through exactly one
//! [`Transform`]. Callers name the transform with a [`Sanitizer`]: either a
//! shorthand [`SanitizerKind`] (`int`, `float`, `string`, `key`, ...) or a
//! custom function. [`SanitizerRegistry`] maps shorthands onto the host's
//! [`HostSanitizers`] and lets an injected [`SanitizerFilter`] substitute its
//! own transform per shorthand.
//!
//! # Example
//! ```ignore
//! use sqlclause::{Sanitizer, SanitizerKind};
//!
//! let by_name = Sanitizer::from("integer");          // SanitizerKind::Integer
//! let unknown = Sanitizer::from("uuid");             // Sanitizer::Unknown, escapes by default
//! let custom = Sanitizer::custom(|raw| raw.len().to_string());
//! ```

use crate::clause::FilterContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A function mapping a raw value to text that is safe to embed in SQL.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Transform(Arc::new(f))
    }

    /// Apply the transform to one raw value.
    pub fn apply(&self, raw: &str) -> String {
        (self.0)(raw)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&"<dyn Fn>").finish()
    }
}

/// Preset sanitizers selectable by shorthand name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SanitizerKind {
    /// Integer cast (`int`, `integer`).
    #[default]
    #[serde(rename = "int", alias = "integer")]
    Integer,
    /// Float cast (`float`, `double`).
    #[serde(rename = "float", alias = "double")]
    Float,
    /// Free-text cleanup followed by literal escaping (`string`).
    #[serde(rename = "string")]
    Text,
    /// Identifier normalization (`key`).
    #[serde(rename = "key")]
    Key,
    /// Literal escaping; the fallback for unrecognized names.
    #[serde(rename = "escape")]
    Escape,
}

impl SanitizerKind {
    /// Look up a shorthand name. Returns `None` for unrecognized names.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "int" | "integer" => Some(SanitizerKind::Integer),
            "float" | "double" => Some(SanitizerKind::Float),
            "string" => Some(SanitizerKind::Text),
            "key" => Some(SanitizerKind::Key),
            _ => None,
        }
    }

    /// The canonical shorthand name. `Escape` has none and reports `"escape"`.
    pub fn name(self) -> &'static str {
        match self {
            SanitizerKind::Integer => "int",
            SanitizerKind::Float => "float",
            SanitizerKind::Text => "string",
            SanitizerKind::Key => "key",
            SanitizerKind::Escape => "escape",
        }
    }
}

/// Look up a shorthand name, falling back to literal escaping.
///
/// Unrecognized names never fall through to raw interpolation.
pub fn resolve_sanitizer_or_default(token: &str) -> SanitizerKind {
    SanitizerKind::from_token(token).unwrap_or_else(|| {
        tracing::debug!(
            target: "sqlclause.fragment",
            token,
            "unrecognized sanitizer, falling back to escape"
        );
        SanitizerKind::Escape
    })
}

/// How the values of one comparison are sanitized.
#[derive(Debug, Clone)]
pub enum Sanitizer {
    /// A preset looked up in the registry.
    Kind(SanitizerKind),
    /// An unrecognized shorthand name, kept verbatim.
    ///
    /// Resolves to literal escaping unless a filter substitutes something.
    Unknown(String),
    /// A caller-supplied transform, used as is.
    Custom(Transform),
}

impl Sanitizer {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Sanitizer::Custom(Transform::new(f))
    }

    /// The preset kind, if this names a recognized shorthand.
    pub fn kind(&self) -> Option<SanitizerKind> {
        match self {
            Sanitizer::Kind(kind) => Some(*kind),
            Sanitizer::Unknown(_) | Sanitizer::Custom(_) => None,
        }
    }

    /// The shorthand name this sanitizer was selected by, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Sanitizer::Kind(kind) => Some(kind.name()),
            Sanitizer::Unknown(token) => Some(token),
            Sanitizer::Custom(_) => None,
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Sanitizer::Kind(SanitizerKind::default())
    }
}

impl From<SanitizerKind> for Sanitizer {
    fn from(kind: SanitizerKind) -> Self {
        Sanitizer::Kind(kind)
    }
}

impl From<&str> for Sanitizer {
    fn from(token: &str) -> Self {
        match SanitizerKind::from_token(token) {
            Some(kind) => Sanitizer::Kind(kind),
            None => Sanitizer::Unknown(token.to_string()),
        }
    }
}

impl From<String> for Sanitizer {
    fn from(token: String) -> Self {
        match SanitizerKind::from_token(&token) {
            Some(kind) => Sanitizer::Kind(kind),
            None => Sanitizer::Unknown(token),
        }
    }
}

impl From<Transform> for Sanitizer {
    fn from(transform: Transform) -> Self {
        Sanitizer::Custom(transform)
    }
}

/// Sanitizing utilities supplied by the host environment.
pub trait HostSanitizers: Send + Sync {
    /// Normalize an arbitrary name into a safe identifier token.
    fn sanitize_identifier(&self, raw: &str) -> String;

    /// Strip unsafe content from free-form text. The result is not quoted.
    fn sanitize_text(&self, raw: &str) -> String;

    /// Render a value as a SQL string literal.
    fn escape_sql(&self, raw: &str) -> String;

    /// Cast to an integer literal.
    fn to_integer(&self, raw: &str) -> String;

    /// Cast to a float literal.
    fn to_float(&self, raw: &str) -> String;
}

/// Built-in host sanitizers.
///
/// - identifiers keep lowercase ASCII alphanumerics, `_` and `-`
/// - text loses markup, percent-encoded octets and repeated whitespace
/// - literals are single-quoted with `'` doubled and NUL removed
/// - numeric casts read the longest numeric prefix and default to `0`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSanitizers;

fn tag_re() -> &'static regex::Regex {
    static TAG_RE: OnceLock<regex::Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| regex::Regex::new(r"<[^>]*>?").expect("invalid built-in tag regex"))
}

fn octet_re() -> &'static regex::Regex {
    static OCTET_RE: OnceLock<regex::Regex> = OnceLock::new();
    OCTET_RE
        .get_or_init(|| regex::Regex::new(r"%[a-fA-F0-9]{2}").expect("invalid built-in octet regex"))
}

fn whitespace_re() -> &'static regex::Regex {
    static WS_RE: OnceLock<regex::Regex> = OnceLock::new();
    WS_RE.get_or_init(|| regex::Regex::new(r"\s+").expect("invalid built-in whitespace regex"))
}

fn float_prefix_re() -> &'static regex::Regex {
    static FLOAT_RE: OnceLock<regex::Regex> = OnceLock::new();
    FLOAT_RE.get_or_init(|| {
        regex::Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("invalid built-in float regex")
    })
}

impl HostSanitizers for DefaultSanitizers {
    fn sanitize_identifier(&self, raw: &str) -> String {
        raw.chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
            .collect()
    }

    fn sanitize_text(&self, raw: &str) -> String {
        let text = tag_re().replace_all(raw, "");
        let text = octet_re().replace_all(&text, "");
        whitespace_re().replace_all(&text, " ").trim().to_string()
    }

    fn escape_sql(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('\'');
        for ch in raw.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\0' => {}
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    fn to_integer(&self, raw: &str) -> String {
        let s = raw.trim_start();
        let sign_len = usize::from(s.starts_with(['+', '-']));
        let digits = s[sign_len..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            return "0".to_string();
        }
        let number = &s[..sign_len + digits];
        match number.parse::<i64>() {
            Ok(n) => n.to_string(),
            // Out of range: saturate.
            Err(_) if number.starts_with('-') => i64::MIN.to_string(),
            Err(_) => i64::MAX.to_string(),
        }
    }

    fn to_float(&self, raw: &str) -> String {
        let value = float_prefix_re()
            .find(raw.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        if value == 0.0 {
            // Avoid rendering `-0`.
            return "0".to_string();
        }
        value.to_string()
    }
}

/// Override hook for sanitizer resolution.
///
/// Receives the transform the registry picked for a preset and returns the
/// one to use instead (or the same one).
///
/// Closures with the matching signature implement this trait.
pub trait SanitizerFilter: Send + Sync {
    fn filter(&self, transform: Transform, sanitizer: &Sanitizer, ctx: &FilterContext<'_>)
    -> Transform;
}

impl<F> SanitizerFilter for F
where
    F: Fn(Transform, &Sanitizer, &FilterContext<'_>) -> Transform + Send + Sync,
{
    fn filter(
        &self,
        transform: Transform,
        sanitizer: &Sanitizer,
        ctx: &FilterContext<'_>,
    ) -> Transform {
        self(transform, sanitizer, ctx)
    }
}

/// A filter that keeps the registry's choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSanitizerFilter;

impl SanitizerFilter for NoopSanitizerFilter {
    fn filter(
        &self,
        transform: Transform,
        _sanitizer: &Sanitizer,
        _ctx: &FilterContext<'_>,
    ) -> Transform {
        transform
    }
}

/// Resolves [`Sanitizer`]s into [`Transform`]s.
#[derive(Clone)]
pub struct SanitizerRegistry {
    host: Arc<dyn HostSanitizers>,
    filter: Arc<dyn SanitizerFilter>,
}

impl Default for SanitizerRegistry {
    fn default() -> Self {
        Self::new(Arc::new(DefaultSanitizers), Arc::new(NoopSanitizerFilter))
    }
}

impl fmt::Debug for SanitizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerRegistry")
            .field("host", &"<dyn HostSanitizers>")
            .field("filter", &"<dyn SanitizerFilter>")
            .finish()
    }
}

impl SanitizerRegistry {
    pub fn new(host: Arc<dyn HostSanitizers>, filter: Arc<dyn SanitizerFilter>) -> Self {
        Self { host, filter }
    }

    /// The host sanitizers presets are built from.
    pub fn host(&self) -> &dyn HostSanitizers {
        &*self.host
    }

    pub(crate) fn set_host(&mut self, host: Arc<dyn HostSanitizers>) {
        self.host = host;
    }

    pub(crate) fn set_filter(&mut self, filter: Arc<dyn SanitizerFilter>) {
        self.filter = filter;
    }

    /// Resolve a sanitizer into a callable transform.
    ///
    /// Custom transforms are returned unchanged. Presets and unrecognized
    /// names go through the filter, which sees the original token.
    pub fn resolve(&self, sanitizer: &Sanitizer, ctx: &FilterContext<'_>) -> Transform {
        let kind = match sanitizer {
            Sanitizer::Custom(transform) => return transform.clone(),
            Sanitizer::Kind(kind) => *kind,
            Sanitizer::Unknown(token) => resolve_sanitizer_or_default(token),
        };
        self.filter.filter(self.preset(kind), sanitizer, ctx)
    }

    fn preset(&self, kind: SanitizerKind) -> Transform {
        let host = Arc::clone(&self.host);
        match kind {
            SanitizerKind::Integer => Transform::new(move |raw| host.to_integer(raw)),
            SanitizerKind::Float => Transform::new(move |raw| host.to_float(raw)),
            SanitizerKind::Text => {
                Transform::new(move |raw| host.escape_sql(&host.sanitize_text(raw)))
            }
            SanitizerKind::Key => Transform::new(move |raw| host.sanitize_identifier(raw)),
            SanitizerKind::Escape => Transform::new(move |raw| host.escape_sql(raw)),
        }
    }
}
