//! Input controls built from field descriptors.
//!
//! Each [`FieldKind`] maps to one builder in a fixed table; adding a kind
//! means adding a variant and a builder, never touching per-record code.

use std::collections::HashMap;

use serde::Serialize;

use transerp_metadata::{DataSource, FieldDescriptor, FieldKind, FieldValue, ValueClass};

use crate::format::{DEFAULT_DATE_FORMAT, DEFAULT_NUMBER_FORMAT};

/// Caller-supplied dropdown options, keyed by field name or source name.
pub type DropdownSources = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInput {
    Plain,
    Email,
    Password,
}

/// Numeric editor flavour, picked from the field's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Integer,
    Decimal,
    Float,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Text {
        value: String,
        placeholder: String,
        input: TextInput,
    },
    Numeric {
        value: FieldValue,
        placeholder: String,
        format: String,
        numeric: NumericKind,
    },
    Checkbox {
        checked: bool,
    },
    Date {
        value: FieldValue,
        placeholder: String,
        format: String,
        with_time: bool,
    },
    Dropdown {
        value: String,
        placeholder: String,
        options: Vec<String>,
        filterable: bool,
    },
    TextArea {
        value: String,
        placeholder: String,
    },
    /// Visible stand-in for a kind no builder knows.
    Unsupported {
        notice: String,
    },
}

/// One rendered input with its label and inline validation message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormControl {
    pub field: &'static str,
    pub label: String,
    pub required: bool,
    pub read_only: bool,
    pub control: Control,
    pub message: Option<String>,
}

/// Everything a builder may look at.
pub struct BuildContext<'a> {
    pub field: &'a FieldDescriptor,
    pub value: &'a FieldValue,
    pub sources: &'a DropdownSources,
}

pub type ControlBuilder = fn(&BuildContext<'_>) -> Control;

pub fn builder_for(kind: &FieldKind) -> ControlBuilder {
    match kind {
        FieldKind::Text => text,
        FieldKind::Email => email,
        FieldKind::Password => password,
        FieldKind::Number => numeric,
        FieldKind::Checkbox => checkbox,
        FieldKind::Date | FieldKind::DateTime => date,
        FieldKind::Dropdown => dropdown,
        FieldKind::TextArea => text_area,
        FieldKind::Unsupported(_) => unsupported,
    }
}

/// Build the full control for one field.
pub fn build_control(
    field: &FieldDescriptor,
    value: &FieldValue,
    sources: &DropdownSources,
    message: Option<&str>,
) -> FormControl {
    let ctx = BuildContext { field, value, sources };
    FormControl {
        field: field.name,
        label: field.form_label(),
        required: field.required,
        read_only: field.read_only,
        control: builder_for(&field.kind)(&ctx),
        message: message.map(str::to_string),
    }
}

fn text_input(ctx: &BuildContext<'_>, input: TextInput) -> Control {
    Control::Text {
        value: ctx.value.to_string(),
        placeholder: ctx.field.placeholder_text().to_string(),
        input,
    }
}

fn text(ctx: &BuildContext<'_>) -> Control {
    text_input(ctx, TextInput::Plain)
}

fn email(ctx: &BuildContext<'_>) -> Control {
    text_input(ctx, TextInput::Email)
}

fn password(ctx: &BuildContext<'_>) -> Control {
    text_input(ctx, TextInput::Password)
}

fn numeric(ctx: &BuildContext<'_>) -> Control {
    let numeric = match ctx.field.value_type.class {
        ValueClass::Integer => NumericKind::Integer,
        ValueClass::Float => NumericKind::Float,
        _ => NumericKind::Decimal,
    };
    Control::Numeric {
        value: ctx.value.clone(),
        placeholder: ctx.field.placeholder_text().to_string(),
        format: ctx
            .field
            .format
            .clone()
            .unwrap_or_else(|| DEFAULT_NUMBER_FORMAT.to_string()),
        numeric,
    }
}

fn checkbox(ctx: &BuildContext<'_>) -> Control {
    Control::Checkbox {
        checked: ctx.value.as_bool().unwrap_or(false),
    }
}

fn date(ctx: &BuildContext<'_>) -> Control {
    Control::Date {
        value: ctx.value.clone(),
        placeholder: ctx.field.placeholder_text().to_string(),
        format: ctx
            .field
            .format
            .clone()
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        with_time: ctx.field.kind == FieldKind::DateTime,
    }
}

fn dropdown(ctx: &BuildContext<'_>) -> Control {
    Control::Dropdown {
        value: ctx.value.to_string(),
        placeholder: ctx.field.placeholder_text().to_string(),
        options: dropdown_options(ctx.field, ctx.sources),
        filterable: true,
    }
}

/// Options for a dropdown: the caller's list for the field wins, then the
/// static list, then a named caller source.
pub fn dropdown_options(field: &FieldDescriptor, sources: &DropdownSources) -> Vec<String> {
    if let Some(list) = sources.get(field.name) {
        return list.clone();
    }
    match &field.data_source {
        DataSource::Static(options) => options.clone(),
        DataSource::Named(key) => sources.get(key).cloned().unwrap_or_default(),
        DataSource::None => Vec::new(),
    }
}

fn text_area(ctx: &BuildContext<'_>) -> Control {
    Control::TextArea {
        value: ctx.value.to_string(),
        placeholder: ctx.field.placeholder_text().to_string(),
    }
}

fn unsupported(ctx: &BuildContext<'_>) -> Control {
    Control::Unsupported {
        notice: format!("Unsupported field type: {}", ctx.field.kind),
    }
}
