//! Per-field validation state of an open form.

use std::collections::BTreeMap;

use transerp_metadata::{FieldDescriptor, FieldValue, Record, RecordMetadata, ValueClass};

/// Validation messages keyed by field name.
///
/// A field with no entry is valid. Messages are replaced wholesale each time
/// the field is validated again. Input that could not be converted stays
/// flagged until the field accepts a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    messages: BTreeMap<&'static str, Vec<String>>,
    unparsed: BTreeMap<&'static str, String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one field against its rules. Returns `true` when it passes.
    pub fn validate_field(&mut self, field: &FieldDescriptor, value: &FieldValue) -> bool {
        let found = field.validation.check(&field.label, value);
        if found.is_empty() {
            self.messages.remove(field.name);
            true
        } else {
            self.messages.insert(field.name, found);
            false
        }
    }

    /// Flag input that could not be stored in `field`.
    pub fn reject_input(&mut self, field: &FieldDescriptor) {
        let message = unparsed_message(field);
        self.messages.insert(field.name, vec![message.clone()]);
        self.unparsed.insert(field.name, message);
    }

    /// Forget a conversion failure once the field took a value.
    pub fn accept_input(&mut self, field: &str) {
        self.unparsed.remove(field);
    }

    /// Check every editable field of `record`.
    ///
    /// Fields hidden from the form cannot be corrected by the user and are
    /// not checked.
    pub fn validate_record<R: Record>(&mut self, meta: &RecordMetadata<R>, record: &R) -> bool {
        self.messages.clear();
        for field in meta.form_fields() {
            if let Ok(value) = meta.get(record, field.name) {
                self.validate_field(field, &value);
            }
        }
        for (name, message) in &self.unparsed {
            self.messages.insert(name, vec![message.clone()]);
        }
        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The message shown inline under the field.
    pub fn first_message(&self, field: &str) -> Option<&str> {
        self.messages_for(field).first().map(String::as_str)
    }

    /// Number of fields currently failing.
    pub fn error_count(&self) -> usize {
        self.messages.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.messages.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.unparsed.clear();
    }
}

fn unparsed_message(field: &FieldDescriptor) -> String {
    match field.value_type.class {
        ValueClass::Integer | ValueClass::Decimal | ValueClass::Float => {
            format!("{} must be a number", field.label)
        }
        ValueClass::Date | ValueClass::DateTime => format!("{} must be a valid date", field.label),
        ValueClass::Bool | ValueClass::Text => format!("{} is invalid", field.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transerp_metadata::{crud_record, metadata_for, FieldConfig};

    crud_record! {
        #[derive(Debug, Clone, Default)]
        struct Contact {
            id: i32 => FieldConfig::new("ID").order(1).required().hide_in_form(),
            name: String => FieldConfig::new("Name").order(2).required().max_length(10),
            mail: String => FieldConfig::new("Mail").order(3).email(),
        }
    }

    #[test]
    fn messages_follow_the_latest_check() {
        let meta = metadata_for::<Contact>();
        let name = meta.field("name").unwrap();
        let mut ctx = ValidationContext::new();

        assert!(!ctx.validate_field(name, &FieldValue::text("")));
        assert_eq!(ctx.first_message("name"), Some("Name is required"));

        assert!(ctx.validate_field(name, &FieldValue::text("Ravi")));
        assert!(ctx.messages_for("name").is_empty());
        assert!(ctx.is_valid());
    }

    #[test]
    fn record_check_skips_hidden_fields() {
        let meta = metadata_for::<Contact>();
        let mut ctx = ValidationContext::new();
        let contact = Contact {
            id: 0,
            name: "A very long name".into(),
            mail: "nope".into(),
        };

        assert!(!ctx.validate_record(&meta, &contact));
        assert_eq!(ctx.error_count(), 2);
        assert_eq!(ctx.first_message("name"), Some("Name cannot exceed 10 characters"));
        assert_eq!(ctx.first_message("mail"), Some("Invalid email format"));
        assert!(ctx.messages_for("id").is_empty());
    }
}
