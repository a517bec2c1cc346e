//! Property tests for field validation.

use proptest::prelude::*;

use formsmith::domain::services::{is_strong_password, ValidationFailure};
use formsmith::{validate, FieldSpec, FieldType, ValidationRule, Value};

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        ".{0,40}".prop_map(Value::Text),
    ]
}

fn any_rule() -> impl Strategy<Value = ValidationRule> {
    (
        any::<bool>(),
        proptest::option::of(0usize..20),
        proptest::option::of(0usize..20),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(not_empty, min_length, max_length, email, custom_password)| ValidationRule {
                not_empty,
                min_length,
                max_length,
                email,
                custom_password,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: validation is total over every rule and value shape.
    #[test]
    fn property_validate_never_panics(rule in any_rule(), value in any_value()) {
        let field = FieldSpec::new("f", FieldType::Text).with_validation(rule);
        let _ = validate(&field, &value);
    }

    /// PROPERTY: a lone maxLength fails exactly when the text is longer.
    #[test]
    fn property_max_length_counts_chars(text in ".{0,30}", max in 1usize..20) {
        let rule = ValidationRule { max_length: Some(max), ..ValidationRule::default() };
        let field = FieldSpec::new("f", FieldType::Text).with_validation(rule);
        let result = validate(&field, &Value::Text(text.clone()));
        if text.chars().count() > max {
            prop_assert_eq!(result, Some(ValidationFailure::MaxLength(max)));
        } else {
            prop_assert_eq!(result, None);
        }
    }

    /// PROPERTY: length, email and password rules only look at text.
    #[test]
    fn property_non_text_only_fails_required(
        rule in any_rule(),
        value in prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1.0e6f64..1.0e6).prop_map(Value::Number),
        ]
    ) {
        let field = FieldSpec::new("f", FieldType::Text).with_validation(rule.clone());
        let expected = (rule.not_empty && value.is_empty()).then_some(ValidationFailure::Required);
        prop_assert_eq!(validate(&field, &value), expected);
    }

    /// PROPERTY: eight or more chars plus a digit is always a strong password.
    #[test]
    fn property_password_with_digit(prefix in "[a-zA-Z!@ ]{7,20}", digit in 0u8..10) {
        let password = format!("{}{}", prefix, digit);
        prop_assert!(is_strong_password(&password));
        prop_assert!(!is_strong_password(&prefix));
    }
}
