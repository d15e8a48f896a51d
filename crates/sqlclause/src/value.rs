//! Raw comparison values and boolean joiners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An unsanitized value supplied by the caller.
///
/// Values are carried as text; the resolved sanitizer decides how they are
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawValue(String);

impl RawValue {
    pub fn new(value: impl Into<String>) -> Self {
        RawValue(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! raw_value_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue(value.to_string())
                }
            }
        )*
    };
}

raw_value_from_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, &str,
    String, &String
);

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue(if value { "1" } else { "0" }.to_string())
    }
}

/// One raw value or an ordered sequence of them.
///
/// Single values and sequences normalize to the same `Vec`, so `equals(5)`
/// and `equals([5])` build identical fragments.
pub trait IntoValueSet {
    fn into_value_set(self) -> Vec<RawValue>;
}

macro_rules! value_set_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValueSet for $ty {
                fn into_value_set(self) -> Vec<RawValue> {
                    vec![RawValue::from(self)]
                }
            }
        )*
    };
}

value_set_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, bool, &str,
    String, &String, RawValue
);

impl<T: Into<RawValue>> IntoValueSet for Vec<T> {
    fn into_value_set(self) -> Vec<RawValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<RawValue>, const N: usize> IntoValueSet for [T; N] {
    fn into_value_set(self) -> Vec<RawValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<RawValue> + Clone> IntoValueSet for &[T] {
    fn into_value_set(self) -> Vec<RawValue> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Boolean keyword combining the per-value terms of one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Joiner {
    #[default]
    Or,
    And,
}

impl Joiner {
    pub fn as_sql(self) -> &'static str {
        match self {
            Joiner::Or => "OR",
            Joiner::And => "AND",
        }
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: impl IntoValueSet) -> Vec<String> {
        values
            .into_value_set()
            .into_iter()
            .map(|v| v.as_str().to_string())
            .collect()
    }

    #[test]
    fn scalar_and_sequence_normalize_alike() {
        assert_eq!(texts(5), texts([5]));
        assert_eq!(texts(5), texts(vec![5]));
        assert_eq!(texts("a"), vec!["a"]);
    }

    #[test]
    fn sequences_keep_order() {
        assert_eq!(texts(vec!["b", "a", "c"]), vec!["b", "a", "c"]);
        let ids: &[i64] = &[3, 1, 2];
        assert_eq!(texts(ids), vec!["3", "1", "2"]);
    }

    #[test]
    fn scalar_rendering() {
        assert_eq!(texts(true), vec!["1"]);
        assert_eq!(texts(2.5), vec!["2.5"]);
        assert_eq!(texts(String::from("x")), vec!["x"]);
    }

    #[test]
    fn joiner_sql() {
        assert_eq!(Joiner::default(), Joiner::Or);
        assert_eq!(Joiner::And.to_string(), "AND");
    }
}
