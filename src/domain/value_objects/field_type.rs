//! FieldType value object - the closed set of input kinds a form field can be

use serde::{Deserialize, Serialize};

/// Kind of input a field collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text
    Text,
    /// Numeric input
    Number,
    /// Multi-line text
    Textarea,
    /// Dropdown with fixed options
    Select,
    /// Radio group with fixed options
    Radio,
    /// Boolean toggle
    Checkbox,
    /// Calendar date (ISO `YYYY-MM-DD`)
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
        }
    }

    /// Choice fields must carry a non-empty option list
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    /// Label given to a freshly added field, e.g. `TEXT field`
    pub fn default_label(&self) -> String {
        format!("{} field", self.as_str().to_uppercase())
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}
