//! Edit buffer bound to generated controls.

use std::sync::Arc;

use thiserror::Error;

use transerp_metadata::{metadata_for, FieldValue, MetadataError, Record, RecordMetadata};

use crate::control::{build_control, DropdownSources, FormControl};
use crate::validation::ValidationContext;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("field '{0}' is read-only")]
    ReadOnly(String),
}

/// A record being added or edited.
///
/// Every change is written straight into the buffer and the changed field is
/// revalidated; nothing is persisted here.
pub struct EditForm<R: Record> {
    meta: Arc<RecordMetadata<R>>,
    record: R,
    validation: ValidationContext,
    sources: DropdownSources,
}

impl<R: Record> EditForm<R> {
    pub fn new(record: R) -> Self {
        Self {
            meta: metadata_for::<R>(),
            record,
            validation: ValidationContext::new(),
            sources: DropdownSources::new(),
        }
    }

    /// Form over a default record.
    pub fn blank() -> Self {
        Self::new(R::default())
    }

    pub fn with_sources(mut self, sources: DropdownSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn metadata(&self) -> &RecordMetadata<R> {
        &self.meta
    }

    /// One control per form field, in descriptor order.
    pub fn controls(&self) -> Vec<FormControl> {
        self.meta
            .form_fields()
            .map(|field| {
                let value = self
                    .meta
                    .get(&self.record, field.name)
                    .unwrap_or(FieldValue::Empty);
                build_control(field, &value, &self.sources, self.validation.first_message(field.name))
            })
            .collect()
    }

    /// Write `value` into `field` and revalidate it. Returns whether the field is now valid.
    pub fn change(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<bool, FormError> {
        let meta = Arc::clone(&self.meta);
        let descriptor = meta.field(field).ok_or_else(|| MetadataError::UnknownField {
            record: R::TYPE_NAME,
            field: field.to_string(),
        })?;
        if descriptor.read_only {
            return Err(FormError::ReadOnly(field.to_string()));
        }

        if let Err(err) = meta.set(&mut self.record, field, value.into()) {
            if matches!(err, MetadataError::InvalidValue { .. }) {
                self.validation.reject_input(descriptor);
            }
            return Err(err.into());
        }
        self.validation.accept_input(descriptor.name);
        let stored = meta.get(&self.record, field)?;
        Ok(self.validation.validate_field(descriptor, &stored))
    }

    /// Check every editable field.
    pub fn validate(&mut self) -> bool {
        self.validation.validate_record(&self.meta, &self.record)
    }

    pub fn validation(&self) -> &ValidationContext {
        &self.validation
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Direct access for computed fields the form does not expose.
    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_record(self) -> R {
        self.record
    }
}

impl<R: Record + core::fmt::Debug> core::fmt::Debug for EditForm<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditForm")
            .field("record", &self.record)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}
