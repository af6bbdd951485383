use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use transerp_core::{RecordId, UserId};
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Student {
        pub student_id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub student_name: String => FieldConfig::new("Student Name").order(2).required().max_length(100).width(200),
        pub phone_number: Option<String> => FieldConfig::new("Phone Number").order(3).max_length(15).width(150),
        pub is_active: Option<bool> => FieldConfig::new("Active")
            .order(4)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(100),
        pub created_date: Option<NaiveDateTime>,
        pub created_by: UserId,
        pub modified_date: Option<NaiveDateTime>,
        pub modified_by: UserId,
    }
}

impl Default for Student {
    fn default() -> Self {
        Self {
            student_id: RecordId::UNSAVED,
            student_name: String::new(),
            phone_number: None,
            is_active: Some(true),
            created_date: None,
            created_by: UserId::default(),
            modified_date: None,
            modified_by: UserId::default(),
        }
    }
}

crate::keyed_by!(Student, student_id);
