//! Fragment text per operator family.

use crate::error::{ClauseError, ClauseResult};
use crate::operator::{OperatorFamily, OperatorSymbol};
use crate::value::Joiner;

/// Check that `count` values can be rendered with `op`.
pub(crate) fn check_arity(op: &OperatorSymbol, count: usize) -> ClauseResult<()> {
    if count == 0 {
        return Err(ClauseError::invalid_argument(format!(
            "`{}` requires at least one value",
            op.as_sql()
        )));
    }
    if op.family() == OperatorFamily::Range && count != 2 {
        return Err(ClauseError::invalid_argument(format!(
            "`{}` requires exactly 2 values, got {count}",
            op.as_sql()
        )));
    }
    Ok(())
}

/// Render one fragment from already sanitized values.
///
/// `values` must have passed [`check_arity`].
pub(crate) fn render(field: &str, op: &OperatorSymbol, values: &[String], joiner: Joiner) -> String {
    let op_sql = op.as_sql();
    match op.family() {
        OperatorFamily::Scalar => group(
            values.iter().map(|v| format!("{field} {op_sql} {v}")),
            joiner,
        ),
        OperatorFamily::Set => format!("{field} {op_sql} ({})", values.join(", ")),
        OperatorFamily::Range => format!("{field} {op_sql} {}", values.join(" AND ")),
        OperatorFamily::Existence => group(values.iter().map(|v| format!("{op_sql} ({v})")), joiner),
    }
}

/// Join terms with `joiner`, parenthesized when there is more than one.
fn group(terms: impl Iterator<Item = String>, joiner: Joiner) -> String {
    let terms: Vec<String> = terms.collect();
    if terms.len() == 1 {
        return terms.into_iter().next().unwrap_or_default();
    }
    format!("({})", terms.join(&format!(" {} ", joiner.as_sql())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;

    fn vals(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scalar_single_and_multi() {
        let op = OperatorSymbol::from(Operator::Gte);
        assert_eq!(render("age", &op, &vals(&["18"]), Joiner::Or), "age >= 18");
        assert_eq!(
            render("age", &op, &vals(&["1", "2"]), Joiner::And),
            "(age >= 1 AND age >= 2)"
        );
    }

    #[test]
    fn set_is_always_parenthesized() {
        let op = OperatorSymbol::from(Operator::In);
        assert_eq!(render("id", &op, &vals(&["1"]), Joiner::Or), "id IN (1)");
        assert_eq!(
            render("id", &op, &vals(&["1", "2", "3"]), Joiner::Or),
            "id IN (1, 2, 3)"
        );
    }

    #[test]
    fn range_and_existence() {
        let between = OperatorSymbol::from(Operator::NotBetween);
        assert_eq!(
            render("score", &between, &vals(&["10", "20"]), Joiner::Or),
            "score NOT BETWEEN 10 AND 20"
        );
        let exists = OperatorSymbol::from(Operator::Exists);
        assert_eq!(render("", &exists, &vals(&["SELECT 1"]), Joiner::Or), "EXISTS (SELECT 1)");
        assert_eq!(
            render("", &exists, &vals(&["a", "b"]), Joiner::Or),
            "(EXISTS (a) OR EXISTS (b))"
        );
    }

    #[test]
    fn extended_symbol_uses_scalar_shape() {
        let op = OperatorSymbol::Extended("ILIKE".to_string());
        assert_eq!(render("name", &op, &vals(&["'a%'"]), Joiner::Or), "name ILIKE 'a%'");
    }

    #[test]
    fn arity() {
        let between = OperatorSymbol::from(Operator::Between);
        assert!(check_arity(&between, 2).is_ok());
        assert!(check_arity(&between, 3).unwrap_err().is_invalid_argument());
        assert!(check_arity(&between, 1).is_err());
        assert!(check_arity(&Operator::Eq.into(), 0).is_err());
        assert!(check_arity(&Operator::In.into(), 5).is_ok());
    }
}
