//! `transerp-metadata` — field metadata for generated forms and grids.
//!
//! A record type declares its fields once through [`crud_record!`]; this crate
//! turns that declaration into ordered [`FieldDescriptor`]s and typed
//! name-addressed accessors, cached per type in a process-wide registry.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod kind;
pub mod record;
pub mod registry;
pub mod validation;
pub mod value;

pub use config::FieldConfig;
pub use descriptor::FieldDescriptor;
pub use error::MetadataError;
pub use extract::{describe_fields, extract_metadata, infer_kind};
pub use kind::{DataSource, FieldKind};
pub use record::{FieldDef, Getter, Record, Setter};
pub use registry::{metadata_for, RecordMetadata};
pub use validation::ValidationRules;
pub use value::{Amount, FieldType, FieldValue, ValueClass, ValueError, ValueType};
