//! Drivers and vehicles.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use transerp_core::{RecordId, UserId};
use transerp_metadata::{crud_record, Amount, FieldConfig, FieldKind};

pub const VEHICLE_TYPES: &str = "Truck,Trailer,Container,Tanker";

crud_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Driver {
        pub id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub name: String => FieldConfig::new("Name").order(2).required().width(200),
        pub mobile: String => FieldConfig::new("Mobile").order(3).required().phone().width(150),
        pub license_number: String => FieldConfig::new("License Number").order(4).required().width(200),
        pub created_date: Option<NaiveDateTime> => FieldConfig::new("Created Date")
            .order(100)
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .hide_in_form(),
        pub created_by: UserId => FieldConfig::new("Created By").order(101).show_in_grid(false).hide_in_form(),
    }
}

crate::keyed_by!(Driver, id);

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Vehicle {
        pub id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub vehicle_number: String => FieldConfig::new("Vehicle Number").order(2).required().max_length(20),
        pub vehicle_type: String => FieldConfig::new("Vehicle Type")
            .order(3)
            .kind(FieldKind::Dropdown)
            .options(VEHICLE_TYPES)
            .width(120),
        pub capacity: Amount => FieldConfig::new("Capacity (Tons)").order(4).kind(FieldKind::Number).format("N2").width(120),
        pub model_year: i32 => FieldConfig::new("Model Year").order(5).kind(FieldKind::Number).format("N0").width(100),
        pub purchase_date: Option<NaiveDate> => FieldConfig::new("Purchase Date").order(6).kind(FieldKind::Date).show_in_grid(false),
        pub insurance_expiry: Option<NaiveDate> => FieldConfig::new("Insurance Expiry").order(7).kind(FieldKind::Date),
        pub is_active: bool => FieldConfig::new("Active")
            .order(8)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(80),
        pub remarks: String => FieldConfig::new("Remarks").order(9).kind(FieldKind::TextArea).show_in_grid(false),
        pub created_date: Option<NaiveDateTime> => FieldConfig::new("Created Date")
            .order(100)
            .kind(FieldKind::DateTime)
            .hide_in_form(),
        pub created_by: UserId => FieldConfig::new("Created By").order(101).show_in_grid(false).hide_in_form(),
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            id: RecordId::UNSAVED,
            vehicle_number: String::new(),
            vehicle_type: "Truck".to_string(),
            capacity: Amount::ZERO,
            model_year: 0,
            purchase_date: None,
            insurance_expiry: None,
            is_active: true,
            remarks: String::new(),
            created_date: None,
            created_by: UserId::default(),
        }
    }
}

crate::keyed_by!(Vehicle, id);
