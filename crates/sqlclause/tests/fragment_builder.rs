use sqlclause::{
    BuilderConfig, ClauseKind, FragmentBuilder, FragmentSeparator, Joiner, Operator, Sanitizer,
    SanitizerKind,
};

#[test]
fn end_to_end_where_clause() {
    let mut qb = FragmentBuilder::new();
    qb.select_field("status").in_with(["a", "b"], "string").unwrap();
    qb.select_field("age").gt(18).unwrap();
    // Fragments are joined with a single space; callers embed their own keywords.
    assert_eq!(qb.assemble(), "WHERE status IN ('a', 'b') age > 18");
}

#[test]
fn end_to_end_with_and_separator() {
    let config = BuilderConfig::new().with_fragment_separator(FragmentSeparator::And);
    let mut qb = FragmentBuilder::with_config(config);
    qb.select_field("status").in_with(["a", "b"], "string").unwrap();
    qb.select_field("age").gt(18).unwrap();
    assert_eq!(qb.assemble(), "WHERE status IN ('a', 'b') AND age > 18");
}

#[test]
fn every_operator_sanitizes_values() {
    let hostile = "1'; DROP TABLE users; --";
    let single = [
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
        Operator::Exists,
        Operator::NotExists,
    ];

    for kind in [
        SanitizerKind::Integer,
        SanitizerKind::Float,
        SanitizerKind::Text,
        SanitizerKind::Key,
        SanitizerKind::Escape,
    ] {
        let mut qb = FragmentBuilder::new();
        let expected = qb.resolve_sanitizer(kind).apply(hostile);
        assert_ne!(expected, hostile);

        for op in single {
            qb.where_field("f")
                .compare_with(op, hostile, kind, Joiner::Or)
                .unwrap();
            let fragment = qb.fragments(ClauseKind::Where).last().unwrap().clone();
            assert!(fragment.contains(&expected), "{op} {kind:?}: {fragment}");
            assert!(!fragment.contains(hostile), "{op} {kind:?}: {fragment}");
        }

        for op in [Operator::Between, Operator::NotBetween] {
            qb.where_field("f")
                .compare_with(op, [hostile, hostile], kind, Joiner::Or)
                .unwrap();
            let fragment = qb.fragments(ClauseKind::Where).last().unwrap().clone();
            assert_eq!(fragment, format!("f {op} {expected} AND {expected}"));
        }
    }
}

#[test]
fn invalid_operator_and_unknown_sanitizer_fall_back() {
    let mut qb = FragmentBuilder::new();
    qb.where_field("name")
        .compare("=~", "x'y", "nvarchar", Joiner::Or)
        .unwrap();
    assert_eq!(qb.assemble(), "WHERE name = 'x''y'");
}

#[test]
fn clauses_accumulate_independently() {
    let mut qb = FragmentBuilder::new();
    qb.clause_field(ClauseKind::Join, "orders.user_id")
        .equals_with("users.id", "key")
        .unwrap();
    qb.where_field("total").gte_with("99.90", "float").unwrap();
    qb.select_field("placed_at")
        .between_with(["2024-01-01", "2024-12-31"], "string")
        .unwrap();

    assert_eq!(
        qb.assemble(),
        "WHERE total >= 99.9 placed_at BETWEEN '2024-01-01' AND '2024-12-31'"
    );
    assert_eq!(qb.assemble(), "");
    assert_eq!(
        qb.assemble_clause(ClauseKind::Join),
        "JOIN ordersuser_id = usersid"
    );
}

#[test]
fn custom_transform_for_subqueries() {
    let subquery = Sanitizer::custom(|raw| {
        raw.chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '=' | '.'))
            .collect()
    });
    let mut qb = FragmentBuilder::new();
    qb.clause(ClauseKind::Where)
        .not_exists_with("SELECT 1 FROM bans WHERE bans.user_id = users.id;", subquery)
        .unwrap();
    assert_eq!(
        qb.assemble(),
        "WHERE NOT EXISTS (SELECT 1 FROM bans WHERE bans.user_id = users.id)"
    );
}

#[test]
fn errors_leave_no_fragment_behind() {
    let mut qb = FragmentBuilder::new();
    assert!(qb.lt(3).unwrap_err().is_invalid_state());
    qb.where_field("score");
    assert!(qb.between([1, 2, 3]).unwrap_err().is_invalid_argument());
    assert!(qb.fragments(ClauseKind::Where).is_empty());
    assert_eq!(qb.assemble(), "");
}

#[test]
fn error_messages() {
    let mut qb = FragmentBuilder::new();
    let err = qb.equals(1).unwrap_err();
    assert_eq!(err.to_string(), "Invalid state: no field selected for `=`");
    qb.where_field("n");
    let err = qb.not_between([1, 2, 3]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid argument: `NOT BETWEEN` requires exactly 2 values, got 3"
    );
}
