//! Validation rule engine
//!
//! `validate` checks a candidate value against a field's rule set. Rules run
//! in a fixed order and the first failure wins:
//!
//! 1. `notEmpty` (any value shape)
//! 2. `minLength`, `maxLength`, `email`, `customPassword` (text values only)
//!
//! Failures are data, not errors: the caller collects them into an error map.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::entities::{FieldSpec, ValidationRule};
use crate::domain::value_objects::Value;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PASSWORD_MIN_CHARS: usize = 8;

/// The first rule a value failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    Required,
    MinLength(usize),
    MaxLength(usize),
    InvalidEmail,
    WeakPassword,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Required => write!(f, "Required"),
            ValidationFailure::MinLength(n) => write!(f, "Min length {}", n),
            ValidationFailure::MaxLength(n) => write!(f, "Max length {}", n),
            ValidationFailure::InvalidEmail => write!(f, "Invalid email"),
            ValidationFailure::WeakPassword => write!(
                f,
                "Password must be at least {} chars and contain a number",
                PASSWORD_MIN_CHARS
            ),
        }
    }
}

/// Check `value` against the field's rules
///
/// A field without a `validation` block always passes.
pub fn validate(field: &FieldSpec, value: &Value) -> Option<ValidationFailure> {
    field
        .validation
        .as_ref()
        .and_then(|rule| validate_rule(rule, value))
}

/// Rule-level check, independent of the field it is attached to
pub fn validate_rule(rule: &ValidationRule, value: &Value) -> Option<ValidationFailure> {
    if rule.not_empty && value.is_empty() {
        return Some(ValidationFailure::Required);
    }

    let Value::Text(text) = value else {
        return None;
    };
    let length = text.chars().count();

    if let Some(min) = rule.min_length.filter(|&n| n > 0) {
        if length < min {
            return Some(ValidationFailure::MinLength(min));
        }
    }
    if let Some(max) = rule.max_length.filter(|&n| n > 0) {
        if length > max {
            return Some(ValidationFailure::MaxLength(max));
        }
    }
    if rule.email && !is_email(text) {
        return Some(ValidationFailure::InvalidEmail);
    }
    if rule.custom_password && !is_strong_password(text) {
        return Some(ValidationFailure::WeakPassword);
    }
    None
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_email(text: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(text))
}

/// At least eight characters and at least one ASCII digit
pub fn is_strong_password(text: &str) -> bool {
    text.chars().count() >= PASSWORD_MIN_CHARS && text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FieldType;

    fn field(rule: ValidationRule) -> FieldSpec {
        FieldSpec::new("f", FieldType::Text).with_validation(rule)
    }

    fn required() -> ValidationRule {
        ValidationRule {
            not_empty: true,
            ..Default::default()
        }
    }

    #[test]
    fn no_rules_always_pass() {
        let plain = FieldSpec::new("f", FieldType::Text);
        assert_eq!(validate(&plain, &Value::Null), None);
        assert_eq!(validate(&field(ValidationRule::default()), &"".into()), None);
    }

    #[test]
    fn required_rejects_null_and_empty_text() {
        let f = field(required());
        assert_eq!(validate(&f, &Value::Null), Some(ValidationFailure::Required));
        assert_eq!(validate(&f, &"".into()), Some(ValidationFailure::Required));
        assert_eq!(validate(&f, &"x".into()), None);
        assert_eq!(validate(&f, &Value::Bool(false)), None);
        assert_eq!(validate(&f, &Value::Number(0.0)), None);
    }

    #[test]
    fn length_limits_count_characters() {
        let f = field(ValidationRule {
            min_length: Some(2),
            max_length: Some(4),
            ..Default::default()
        });
        assert_eq!(validate(&f, &"a".into()), Some(ValidationFailure::MinLength(2)));
        assert_eq!(validate(&f, &"ééé".into()), None);
        assert_eq!(
            validate(&f, &"abcde".into()),
            Some(ValidationFailure::MaxLength(4))
        );
    }

    #[test]
    fn zero_length_limits_are_unset() {
        let f = field(ValidationRule {
            min_length: Some(0),
            max_length: Some(0),
            ..Default::default()
        });
        assert_eq!(validate(&f, &"anything at all".into()), None);
    }

    #[test]
    fn empty_text_without_not_empty_still_checks_min_length() {
        let f = field(ValidationRule {
            min_length: Some(3),
            ..Default::default()
        });
        assert_eq!(validate(&f, &"".into()), Some(ValidationFailure::MinLength(3)));
    }

    #[test]
    fn non_text_values_skip_text_rules() {
        let f = field(ValidationRule {
            min_length: Some(5),
            email: true,
            ..Default::default()
        });
        assert_eq!(validate(&f, &Value::Number(1.0)), None);
        assert_eq!(validate(&f, &Value::Bool(true)), None);
    }

    #[test]
    fn email_pattern() {
        let f = field(ValidationRule {
            email: true,
            ..Default::default()
        });
        assert_eq!(validate(&f, &"a@b.co".into()), None);
        assert_eq!(
            validate(&f, &"a@b".into()),
            Some(ValidationFailure::InvalidEmail)
        );
        assert_eq!(
            validate(&f, &"a b@c.de".into()),
            Some(ValidationFailure::InvalidEmail)
        );
    }

    #[test]
    fn password_rules_run_after_length() {
        let f = field(ValidationRule {
            min_length: Some(8),
            custom_password: true,
            ..Default::default()
        });
        assert_eq!(validate(&f, &"abcdefg1".into()), None);
        assert_eq!(
            validate(&f, &"abcdefgh".into()),
            Some(ValidationFailure::WeakPassword)
        );
        assert_eq!(
            validate(&f, &"a1".into()),
            Some(ValidationFailure::MinLength(8))
        );
    }

    #[test]
    fn first_failure_wins() {
        let f = field(ValidationRule {
            not_empty: true,
            min_length: Some(3),
            email: true,
            ..Default::default()
        });
        assert_eq!(validate(&f, &"".into()), Some(ValidationFailure::Required));
        assert_eq!(validate(&f, &"ab".into()), Some(ValidationFailure::MinLength(3)));
        assert_eq!(validate(&f, &"abc".into()), Some(ValidationFailure::InvalidEmail));
    }

    #[test]
    fn messages() {
        insta::assert_snapshot!(ValidationFailure::Required.to_string(), @"Required");
        insta::assert_snapshot!(ValidationFailure::MinLength(8).to_string(), @"Min length 8");
        insta::assert_snapshot!(ValidationFailure::MaxLength(3).to_string(), @"Max length 3");
        insta::assert_snapshot!(ValidationFailure::InvalidEmail.to_string(), @"Invalid email");
        insta::assert_snapshot!(
            ValidationFailure::WeakPassword.to_string(),
            @"Password must be at least 8 chars and contain a number"
        );
    }
}
