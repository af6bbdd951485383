//! Field kinds and dropdown option sources.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Input control family a field renders as.
///
/// Names parse case-insensitively; anything unknown is kept verbatim in
/// `Unsupported` so the form can show what was configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Checkbox,
    Date,
    DateTime,
    Dropdown,
    TextArea,
    Password,
    Unsupported(String),
}

impl FieldKind {
    /// Parse a declarative kind name (`"dropdown"`, `"DateTime"`, ...).
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "checkbox" => Self::Checkbox,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "dropdown" => Self::Dropdown,
            "textarea" => Self::TextArea,
            "password" => Self::Password,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Dropdown => "dropdown",
            Self::TextArea => "textarea",
            Self::Password => "password",
            Self::Unsupported(name) => name.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::Text
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldKind {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Where a dropdown gets its options from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    None,
    /// Fixed options declared with the field.
    Static(Vec<String>),
    /// Options supplied by the page at render time under this key.
    Named(String),
}

impl DataSource {
    /// Split a comma list (`"Active, Inactive"`) into trimmed, non-empty options.
    pub fn from_list(list: &str) -> Self {
        let options: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if options.is_empty() {
            Self::None
        } else {
            Self::Static(options)
        }
    }

    pub fn named(key: impl Into<String>) -> Self {
        Self::Named(key.into())
    }

    pub fn static_options(&self) -> &[String] {
        match self {
            Self::Static(options) => options,
            _ => &[],
        }
    }
}
