//! Property tests for the expression language.

use chrono::NaiveDate;
use proptest::prelude::*;

use formsmith::domain::services::expression::Expression;
use formsmith::{FieldId, Value, ValueMap};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn expression_chars() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9 .'\\[\\]()+*/%<>=!?:&|-]{0,60}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: arbitrary input never panics the parser or evaluator.
    #[test]
    fn property_parse_and_eval_never_panic(source in expression_chars()) {
        if let Ok(expr) = Expression::parse(&source) {
            let _ = expr.evaluate(&ValueMap::new(), today());
        }
    }

    /// PROPERTY: unicode input never panics the lexer.
    #[test]
    fn property_unicode_never_panics(source in "\\PC{0,40}") {
        let _ = Expression::parse(&source);
    }

    /// PROPERTY: integer arithmetic agrees with Rust's.
    #[test]
    fn property_arithmetic_matches(a in -1000i64..1000, b in -1000i64..1000, c in -1000i64..1000) {
        let expr = Expression::parse(&format!("{} + {} * {}", a, b, c)).unwrap();
        let value = expr.evaluate(&ValueMap::new(), today()).unwrap();
        prop_assert_eq!(value, Value::Number((a + b * c) as f64));
    }

    /// PROPERTY: field reads are collected exactly.
    #[test]
    fn property_field_refs(ids in proptest::collection::btree_set("[a-z][a-z0-9_]{0,8}", 1..5)) {
        let source = ids
            .iter()
            .map(|id| format!("fields['{}']", id))
            .collect::<Vec<_>>()
            .join(" + ");
        let expr = Expression::parse(&source).unwrap();
        let expected: std::collections::BTreeSet<FieldId> =
            ids.iter().map(|id| FieldId::from(id.as_str())).collect();
        prop_assert_eq!(expr.field_refs(), expected);
    }
}
