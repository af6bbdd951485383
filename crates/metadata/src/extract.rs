//! Derive field descriptors from a record's field table.

use transerp_core::audit;

use crate::config::{DEFAULT_GRID_WIDTH, DEFAULT_ORDER, FieldConfig};
use crate::descriptor::FieldDescriptor;
use crate::kind::FieldKind;
use crate::record::{FieldDef, Record};
use crate::value::{ValueClass, ValueType};

/// Ordered descriptors for every declared field of `R`.
///
/// Pure; see [`metadata_for`](crate::metadata_for) for the cached variant.
pub fn extract_metadata<R: Record>() -> Vec<FieldDescriptor> {
    describe_fields(&R::field_defs())
}

/// Describe `defs` and sort by `(order, name)`.
pub fn describe_fields<R>(defs: &[FieldDef<R>]) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = defs.iter().map(describe).collect();
    fields.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(b.name)));
    fields
}

pub fn describe<R>(def: &FieldDef<R>) -> FieldDescriptor {
    match &def.config {
        Some(config) => configured(def.name, def.value_type, config),
        None => inferred(def.name, def.value_type),
    }
}

fn configured(name: &'static str, value_type: ValueType, config: &FieldConfig) -> FieldDescriptor {
    let label = if config.label.trim().is_empty() {
        name.to_string()
    } else {
        config.label.clone()
    };

    FieldDescriptor {
        name,
        label,
        kind: config.kind.clone(),
        required: config.required,
        order: config.order,
        show_in_grid: config.show_in_grid,
        grid_width: config.grid_width,
        data_source: config.data_source.clone(),
        format: config.format.clone(),
        placeholder: config.placeholder.clone(),
        read_only: config.read_only,
        hide_in_form: config.hide_in_form,
        grid_template: config.grid_template.clone(),
        value_type,
        validation: config.validation.clone(),
    }
}

fn inferred(name: &'static str, value_type: ValueType) -> FieldDescriptor {
    let system = audit::is_system_field(name);

    FieldDescriptor {
        name,
        label: name.to_string(),
        kind: infer_kind(value_type),
        required: false,
        order: DEFAULT_ORDER,
        show_in_grid: !system,
        grid_width: DEFAULT_GRID_WIDTH,
        data_source: Default::default(),
        format: None,
        placeholder: None,
        read_only: false,
        hide_in_form: system,
        grid_template: None,
        value_type,
        validation: Default::default(),
    }
}

pub fn infer_kind(value_type: ValueType) -> FieldKind {
    match value_type.class {
        ValueClass::Bool => FieldKind::Checkbox,
        ValueClass::Date => FieldKind::Date,
        ValueClass::DateTime => FieldKind::DateTime,
        ValueClass::Integer | ValueClass::Decimal | ValueClass::Float => FieldKind::Number,
        ValueClass::Text => FieldKind::Text,
    }
}
