//! Records and their compile-time field tables.

use crate::config::FieldConfig;
use crate::value::{FieldValue, ValueError, ValueType};

pub type Getter<R> = fn(&R) -> FieldValue;
pub type Setter<R> = fn(&mut R, FieldValue) -> Result<(), ValueError>;

/// One declared field of a record type.
pub struct FieldDef<R> {
    pub name: &'static str,
    pub value_type: ValueType,
    /// Explicit display configuration; `None` means "infer from the type".
    pub config: Option<FieldConfig>,
    pub get: Getter<R>,
    pub set: Setter<R>,
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            value_type: self.value_type,
            config: self.config.clone(),
            get: self.get,
            set: self.set,
        }
    }
}

impl<R> core::fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A type whose fields drive generated forms and grids.
///
/// Implemented through [`crud_record!`](crate::crud_record), which keeps the
/// struct definition and its field table in one place.
pub trait Record: Default + Clone + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    /// Every declared field, in declaration order.
    fn field_defs() -> Vec<FieldDef<Self>>;
}

/// Declare a record struct together with its [`Record`] impl.
///
/// A field may carry `=> <FieldConfig expr>`; fields without it are inferred
/// from their type when metadata is extracted.
///
/// ```
/// use transerp_metadata::{crud_record, FieldConfig, Record};
///
/// crud_record! {
///     #[derive(Debug, Clone, Default)]
///     pub struct City {
///         pub id: i32 => FieldConfig::new("ID").order(1).hide_in_form(),
///         pub city_name: String => FieldConfig::new("City Name").order(2).required(),
///         pub is_active: bool,
///     }
/// }
///
/// assert_eq!(City::field_defs().len(), 3);
/// ```
#[macro_export]
macro_rules! crud_record {
    (@config) => {
        ::core::option::Option::None
    };
    (@config $cfg:expr) => {
        ::core::option::Option::Some($cfg)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $cfg:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            const TYPE_NAME: &'static str = ::core::stringify!($name);

            fn field_defs() -> ::std::vec::Vec<$crate::FieldDef<Self>> {
                ::std::vec![
                    $(
                        $crate::FieldDef {
                            name: ::core::stringify!($field),
                            value_type: <$fty as $crate::FieldType>::VALUE_TYPE,
                            config: $crate::crud_record!(@config $($cfg)?),
                            get: |record: &Self| $crate::FieldType::to_value(&record.$field),
                            set: |record: &mut Self, value: $crate::FieldValue|
                                -> ::core::result::Result<(), $crate::ValueError> {
                                record.$field = <$fty as $crate::FieldType>::from_value(value)?;
                                ::core::result::Result::Ok(())
                            },
                        },
                    )*
                ]
            }
        }
    };
}
