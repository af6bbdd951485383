use thiserror::Error;

use crate::value::ValueError;

/// Errors raised when addressing a record field by name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("{record} has no field named '{field}'")]
    UnknownField { record: &'static str, field: String },

    #[error("invalid value for {record}.{field}: {source}")]
    InvalidValue {
        record: &'static str,
        field: String,
        #[source]
        source: ValueError,
    },
}

impl MetadataError {
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field, .. } | Self::InvalidValue { field, .. } => field,
        }
    }
}
