//! Categories and their types, plus user categories.

use serde::{Deserialize, Serialize};
use transerp_core::RecordId;
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryType {
        pub cat_type_id: RecordId => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
        pub cat_type_name: String => FieldConfig::new("Category Type").order(2).required().width(200),
    }
}

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub cat_id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub cat_name: String => FieldConfig::new("Category Name").order(2).required().width(200),
        /// Picked from the `category_types` source; 0 means nothing picked.
        pub cat_type_id: RecordId => FieldConfig::new("Category Type")
            .order(3)
            .required()
            .kind(FieldKind::Dropdown)
            .source("category_types")
            .range(1.0, f64::from(i32::MAX))
            .placeholder("Select category type")
            .width(180),
        pub is_active: bool => FieldConfig::new("Active")
            .order(4)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(100),
    }
}

impl Default for Category {
    fn default() -> Self {
        Self {
            cat_id: RecordId::UNSAVED,
            cat_name: String::new(),
            cat_type_id: RecordId::UNSAVED,
            is_active: true,
        }
    }
}

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserCategory {
        pub user_category_id: RecordId => FieldConfig::new("ID").order(1).width(80).hide_in_form(),
        pub user_category_name: Option<String> => FieldConfig::new("User Category").order(2).max_length(150).width(200),
        pub is_active: Option<bool> => FieldConfig::new("Active")
            .order(3)
            .kind(FieldKind::Checkbox)
            .template("ActiveBadge")
            .width(100),
    }
}

impl Default for UserCategory {
    fn default() -> Self {
        Self {
            user_category_id: RecordId::UNSAVED,
            user_category_name: None,
            is_active: Some(true),
        }
    }
}

crate::keyed_by!(CategoryType, cat_type_id);
crate::keyed_by!(Category, cat_id);
crate::keyed_by!(UserCategory, user_category_id);

#[cfg(test)]
mod tests {
    use super::*;
    use transerp_metadata::{metadata_for, FieldValue};

    #[test]
    fn unpicked_type_fails_the_range() {
        let meta = metadata_for::<Category>();
        let cat_type = meta.field("cat_type_id").unwrap();
        assert_eq!(cat_type.kind, FieldKind::Dropdown);

        let unpicked = meta.get(&Category::default(), "cat_type_id").unwrap();
        assert_eq!(
            cat_type.validation.check(&cat_type.label, &unpicked),
            ["Category Type must be at least 1"]
        );
        assert!(cat_type
            .validation
            .check(&cat_type.label, &FieldValue::Integer(2))
            .is_empty());
    }

    #[test]
    fn user_category_name_is_optional() {
        let meta = metadata_for::<UserCategory>();
        let name = meta.field("user_category_name").unwrap();
        assert!(!name.required);
        assert_eq!(name.validation.max_length, Some(150));
        assert_eq!(UserCategory::default().is_active, Some(true));
    }
}
