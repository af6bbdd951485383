//! Declarative validation rules attached to a field.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

const EMAIL: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE: &str = r"^\+?[0-9][0-9\s\-().]{5,18}[0-9]$";

/// Compiled custom patterns, keyed by source.
static PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn matches_pattern(pattern: &str, input: &str) -> Option<bool> {
    if let Ok(cache) = PATTERNS.read() {
        if let Some(re) = cache.get(pattern) {
            return Some(re.is_match(input));
        }
    }

    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(pattern, error = %err, "invalid validation pattern");
            return None;
        }
    };
    let matched = re.is_match(input);
    if let Ok(mut cache) = PATTERNS.write() {
        cache.insert(pattern.to_string(), re);
    }
    Some(matched)
}

/// Constraints checked before a record is handed to a save handler.
///
/// `message` replaces the default text of format failures (pattern, email,
/// phone); presence and bound failures keep their own wording.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    pub email: bool,
    pub phone: bool,
    pub message: Option<String>,
}

impl ValidationRules {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn format_message(&self, fallback: String) -> String {
        self.message.clone().unwrap_or(fallback)
    }

    /// Check `value` and return every failure message, in rule order.
    pub fn check(&self, label: &str, value: &FieldValue) -> Vec<String> {
        let mut messages = Vec::new();

        if value.is_empty() {
            if self.required {
                messages.push(format!("{label} is required"));
            }
            return messages;
        }

        if let FieldValue::Text(text) = value {
            let len = text.chars().count();
            if let Some(min) = self.min_length {
                if len < min {
                    messages.push(format!("{label} must be at least {min} characters"));
                }
            }
            if let Some(max) = self.max_length {
                if len > max {
                    messages.push(format!("{label} cannot exceed {max} characters"));
                }
            }
            if let Some(pattern) = &self.pattern {
                if matches_pattern(pattern, text) == Some(false) {
                    messages.push(self.format_message(format!("{label} has an invalid format")));
                }
            }
            if self.email && matches_pattern(EMAIL, text.trim()) == Some(false) {
                messages.push(self.format_message("Invalid email format".to_string()));
            }
            if self.phone && matches_pattern(PHONE, text.trim()) == Some(false) {
                messages.push(self.format_message("Invalid phone number".to_string()));
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = self.min {
                if number < min {
                    messages.push(format!("{label} must be at least {min}"));
                }
            }
            if let Some(max) = self.max {
                if number > max {
                    messages.push(format!("{label} must be at most {max}"));
                }
            }
        }

        messages
    }
}
