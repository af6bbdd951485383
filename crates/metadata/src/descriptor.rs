use serde::Serialize;

use crate::kind::{DataSource, FieldKind};
use crate::validation::ValidationRules;
use crate::value::ValueType;

/// How one record field is displayed, edited and validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub order: i32,
    pub show_in_grid: bool,
    pub grid_width: u32,
    pub data_source: DataSource,
    pub format: Option<String>,
    pub placeholder: Option<String>,
    pub read_only: bool,
    pub hide_in_form: bool,
    pub grid_template: Option<String>,
    pub value_type: ValueType,
    pub validation: ValidationRules,
}

impl FieldDescriptor {
    pub fn show_in_form(&self) -> bool {
        !self.hide_in_form
    }

    /// Label as shown next to an input; required fields carry a trailing marker.
    pub fn form_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }

    pub fn placeholder_text(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(&self.label)
    }
}
