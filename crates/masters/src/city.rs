use serde::{Deserialize, Serialize};
use transerp_core::RecordId;
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct City {
        pub id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub city_name: String => FieldConfig::new("City Name").order(2).required().width(200),
        pub state: String => FieldConfig::new("State").order(3).width(150),
        pub is_active: bool => FieldConfig::new("Active")
            .order(4)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(100),
    }
}

impl Default for City {
    fn default() -> Self {
        Self {
            id: RecordId::UNSAVED,
            city_name: String::new(),
            state: String::new(),
            is_active: true,
        }
    }
}

crate::keyed_by!(City, id);
