//! Value - the dynamic scalar a field holds
//!
//! Form values arrive from loosely typed inputs (text boxes, toggles, stored
//! JSON), so a field holds one of four scalar shapes rather than a type fixed
//! by its `FieldType`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FieldId, FieldType};

/// Live values of a form instance, keyed by field id
pub type ValueMap = BTreeMap<FieldId, Value>;

/// A scalar field value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value (also stands in for "undefined")
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Empty in the "Required" sense: null or the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness, following the usual scripting conventions
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Name of the shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
        }
    }

    /// Type-appropriate empty value for a freshly opened form
    pub fn empty_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Checkbox => Value::Bool(false),
            _ => Value::Text(String::new()),
        }
    }

    /// Convert raw user input into a value shaped for the field
    ///
    /// Checkboxes accept `true/false/1/0/yes/no/on/off`; numbers become
    /// numeric when they parse. Anything else stays text.
    pub fn from_input(field_type: FieldType, raw: &str) -> Self {
        match field_type {
            FieldType::Checkbox => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Value::Bool(true),
                "false" | "0" | "no" | "off" | "" => Value::Bool(false),
                _ => Value::Text(raw.to_string()),
            },
            FieldType::Number => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::Text(raw.to_string()),
            },
            _ => Value::Text(raw.to_string()),
        }
    }
}

/// Render a number without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Integral numbers are written as integers so stored JSON stays tidy
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueDe {
    Bool(bool),
    Number(f64),
    Text(String),
    Null(()),
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ValueDe::deserialize(deserializer)? {
            ValueDe::Bool(b) => Value::Bool(b),
            ValueDe::Number(n) => Value::Number(n),
            ValueDe::Text(s) => Value::Text(s),
            ValueDe::Null(()) => Value::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_means_null_or_empty_string() {
        assert!(Value::Null.is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(!Value::Text(" ".into()).is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::Number(0.0).is_empty());
    }

    #[test]
    fn empty_for_checkbox_is_false() {
        assert_eq!(Value::empty_for(FieldType::Checkbox), Value::Bool(false));
        assert_eq!(Value::empty_for(FieldType::Date), Value::Text(String::new()));
    }

    #[test]
    fn from_input_types_by_field() {
        assert_eq!(Value::from_input(FieldType::Checkbox, "on"), Value::Bool(true));
        assert_eq!(Value::from_input(FieldType::Number, " 42 "), Value::Number(42.0));
        assert_eq!(
            Value::from_input(FieldType::Number, "forty"),
            Value::Text("forty".into())
        );
        assert_eq!(Value::from_input(FieldType::Text, "42"), Value::Text("42".into()));
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(Value::Number(20.0).to_string(), "20");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn json_shapes() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Number(21.0),
            Value::Number(0.5),
            Value::Text("hi".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,21,0.5,"hi"]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn nested_json_is_rejected() {
        assert!(serde_json::from_str::<Value>("[1,2]").is_err());
        assert!(serde_json::from_str::<Value>("{\"a\":1}").is_err());
    }
}
