//! Grid columns and cells from the same descriptors as the form.

use std::collections::HashMap;

use serde::Serialize;

use transerp_metadata::{metadata_for, FieldDescriptor, FieldValue, Record};

use crate::format::format_value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridColumn {
    pub field: &'static str,
    pub header: String,
    pub width: u32,
    pub format: Option<String>,
    pub template: Option<String>,
}

/// Visible columns in descriptor order.
pub fn grid_columns(fields: &[FieldDescriptor]) -> Vec<GridColumn> {
    fields
        .iter()
        .filter(|f| f.show_in_grid)
        .map(|f| GridColumn {
            field: f.name,
            header: f.label.clone(),
            width: f.grid_width,
            format: f.format.clone(),
            template: f.grid_template.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Success,
    Danger,
}

impl BadgeTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "badge-success",
            Self::Danger => "badge-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cell", rename_all = "snake_case")]
pub enum GridCell {
    Text { text: String },
    Badge { label: String, tone: BadgeTone },
}

impl GridCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Badge { label, .. } => label,
        }
    }
}

pub type CellTemplate = fn(&FieldValue) -> GridCell;

/// Named cell renderers referenced by `grid_template` in field configuration.
#[derive(Debug, Clone)]
pub struct CellTemplates {
    templates: HashMap<String, CellTemplate>,
}

impl CellTemplates {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn register(mut self, name: impl Into<String>, template: CellTemplate) -> Self {
        self.templates.insert(name.into(), template);
        self
    }

    pub fn get(&self, name: &str) -> Option<CellTemplate> {
        self.templates.get(name).copied()
    }
}

/// `ActiveBadge` and `StatusBadge`, both keyed on a boolean.
impl Default for CellTemplates {
    fn default() -> Self {
        Self::empty()
            .register("ActiveBadge", active_badge)
            .register("StatusBadge", active_badge)
    }
}

fn active_badge(value: &FieldValue) -> GridCell {
    if value.as_bool().unwrap_or(false) {
        GridCell::Badge {
            label: "Active".into(),
            tone: BadgeTone::Success,
        }
    } else {
        GridCell::Badge {
            label: "Inactive".into(),
            tone: BadgeTone::Danger,
        }
    }
}

pub fn render_cell(field: &FieldDescriptor, value: &FieldValue, templates: &CellTemplates) -> GridCell {
    let template = field.grid_template.as_deref().and_then(|name| {
        let found = templates.get(name);
        if found.is_none() {
            tracing::debug!(field = field.name, template = name, "unknown cell template");
        }
        found
    });

    match template {
        Some(render) => render(value),
        None => GridCell::text(format_value(value, field.format.as_deref())),
    }
}

/// One row of cells per record, columns as in [`grid_columns`].
pub fn render_rows<R: Record>(records: &[R], templates: &CellTemplates) -> Vec<Vec<GridCell>> {
    let meta = metadata_for::<R>();
    records
        .iter()
        .map(|record| {
            meta.grid_fields()
                .map(|field| {
                    let value = meta.get(record, field.name).unwrap_or(FieldValue::Empty);
                    render_cell(field, &value, templates)
                })
                .collect()
        })
        .collect()
}
