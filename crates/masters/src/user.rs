//! Application users as maintained on the user master (not the signed-in session).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use transerp_core::RecordId;
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: RecordId,
        pub user_name: String => FieldConfig::new("User Name")
            .order(1)
            .required()
            .min_length(3)
            .max_length(50)
            .width(150),
        pub email: String => FieldConfig::new("Email")
            .order(2)
            .kind(FieldKind::Email)
            .required()
            .email()
            .message("Invalid email address")
            .width(200),
        pub mobile: Option<String> => FieldConfig::new("Mobile").order(3).phone().width(120),
        pub role: String => FieldConfig::new("Role")
            .order(4)
            .required()
            .kind(FieldKind::Dropdown)
            .source("roles")
            .width(120),
        pub department: Option<String> => FieldConfig::new("Department").order(5).width(150),
        pub designation: Option<String> => FieldConfig::new("Designation").order(6).width(150),
        pub is_active: bool => FieldConfig::new("Active")
            .order(7)
            .kind(FieldKind::Checkbox)
            .template("StatusBadge")
            .width(100),
        pub created_date: Option<NaiveDateTime>,
        pub last_login_date: Option<NaiveDateTime> => FieldConfig::new("Last Login")
            .order(8)
            .kind(FieldKind::DateTime)
            .format("dd MMM yyyy HH:mm")
            .read_only()
            .hide_in_form(),
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: RecordId::UNSAVED,
            user_name: String::new(),
            email: String::new(),
            mobile: None,
            role: String::new(),
            department: None,
            designation: None,
            is_active: true,
            created_date: None,
            last_login_date: None,
        }
    }
}

crate::keyed_by!(User, id);

#[cfg(test)]
mod tests {
    use super::*;
    use transerp_metadata::metadata_for;

    #[test]
    fn unconfigured_id_stays_out_of_both_views() {
        let meta = metadata_for::<User>();
        let id = meta.field("id").unwrap();
        assert!(id.hide_in_form);
        assert!(!id.show_in_grid);
        assert!(meta.grid_fields().all(|f| f.name != "created_date"));
    }

    #[test]
    fn name_length_bounds() {
        let meta = metadata_for::<User>();
        let name = meta.field("user_name").unwrap();
        assert_eq!(name.validation.min_length, Some(3));
        assert_eq!(name.validation.max_length, Some(50));
    }
}
