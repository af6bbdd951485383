//! `transerp-masters` — master-data records.
//!
//! Each type is declared once with its field configuration; forms, grids and
//! validation for it are generated from that declaration.

pub mod attendance;
pub mod category;
pub mod city;
pub mod company;
pub mod customer;
pub mod fleet;
pub mod student;
pub mod user;

pub use attendance::StudentAttendance;
pub use category::{Category, CategoryType, UserCategory};
pub use city::City;
pub use company::Company;
pub use customer::Customer;
pub use fleet::{Driver, Vehicle, VEHICLE_TYPES};
pub use student::Student;
pub use user::User;

/// Implement [`transerp_core::Entity`] over a record's key field.
macro_rules! keyed_by {
    ($record:ty, $key:ident) => {
        impl transerp_core::Entity for $record {
            fn id(&self) -> transerp_core::RecordId {
                self.$key
            }

            fn set_id(&mut self, id: transerp_core::RecordId) {
                self.$key = id;
            }
        }
    };
}

pub(crate) use keyed_by;
