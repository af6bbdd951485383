//! Per-type metadata, computed once and shared.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::descriptor::FieldDescriptor;
use crate::error::MetadataError;
use crate::extract::describe_fields;
use crate::record::{Getter, Record, Setter};
use crate::value::FieldValue;

type Entry = Arc<dyn Any + Send + Sync>;

static REGISTRY: Lazy<RwLock<HashMap<TypeId, Entry>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Descriptors plus name-addressed accessors for one record type.
pub struct RecordMetadata<R> {
    fields: Vec<FieldDescriptor>,
    accessors: HashMap<&'static str, (Getter<R>, Setter<R>)>,
}

impl<R: Record> RecordMetadata<R> {
    pub fn build() -> Self {
        let defs = R::field_defs();
        let fields = describe_fields(&defs);
        let accessors = defs.iter().map(|d| (d.name, (d.get, d.set))).collect();
        Self { fields, accessors }
    }

    pub fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    /// All descriptors, sorted by `(order, name)`.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.show_in_form())
    }

    pub fn grid_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.show_in_grid)
    }

    pub fn get(&self, record: &R, name: &str) -> Result<FieldValue, MetadataError> {
        let (get, _) = self.accessor(name)?;
        Ok(get(record))
    }

    /// Write `value` into the named field, converting it to the field's type.
    pub fn set(&self, record: &mut R, name: &str, value: FieldValue) -> Result<(), MetadataError> {
        let (_, set) = self.accessor(name)?;
        set(record, value).map_err(|source| MetadataError::InvalidValue {
            record: R::TYPE_NAME,
            field: name.to_string(),
            source,
        })
    }

    fn accessor(&self, name: &str) -> Result<(Getter<R>, Setter<R>), MetadataError> {
        self.accessors
            .get(name)
            .copied()
            .ok_or_else(|| MetadataError::UnknownField {
                record: R::TYPE_NAME,
                field: name.to_string(),
            })
    }
}

/// Shared metadata for `R`, extracted on first use.
pub fn metadata_for<R: Record>() -> Arc<RecordMetadata<R>> {
    let key = TypeId::of::<R>();

    if let Ok(registry) = REGISTRY.read() {
        if let Some(entry) = registry.get(&key) {
            if let Ok(found) = Arc::clone(entry).downcast::<RecordMetadata<R>>() {
                return found;
            }
        }
    }

    let built = Arc::new(RecordMetadata::<R>::build());
    tracing::debug!(record = R::TYPE_NAME, fields = built.fields.len(), "extracted record metadata");

    let Ok(mut registry) = REGISTRY.write() else {
        return built;
    };
    let entry = registry
        .entry(key)
        .or_insert_with(|| Arc::clone(&built) as Entry);
    Arc::clone(entry)
        .downcast::<RecordMetadata<R>>()
        .unwrap_or(built)
}
