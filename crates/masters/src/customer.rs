use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use transerp_core::{RecordId, UserId};
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    /// Billed party on invoices.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Customer {
        pub customer_id: RecordId => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
        pub customer_name: String => FieldConfig::new("Customer Name").order(2).required().max_length(50).width(200),
        pub email: String => FieldConfig::new("Email")
            .order(3)
            .kind(FieldKind::Email)
            .required()
            .max_length(50)
            .email()
            .width(200),
        pub phone_number: String => FieldConfig::new("Phone Number")
            .order(4)
            .required()
            .max_length(50)
            .phone()
            .message("Invalid phone number format")
            .width(150),
        pub is_active: bool => FieldConfig::new("Active")
            .order(5)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(100),
        pub created_by: UserId,
        pub created_date: Option<NaiveDateTime>,
        pub modified_by: UserId,
        pub modified_date: Option<NaiveDateTime>,
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            customer_id: RecordId::UNSAVED,
            customer_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            is_active: true,
            created_by: UserId::default(),
            created_date: None,
            modified_by: UserId::default(),
            modified_date: None,
        }
    }
}

crate::keyed_by!(Customer, customer_id);
