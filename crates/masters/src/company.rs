//! Operating companies.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use transerp_core::RecordId;
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

/// 15-character Indian GSTIN.
pub const GST_PATTERN: &str = r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$";
pub const PAN_PATTERN: &str = r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$";

crud_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Company {
        pub company_id: RecordId => FieldConfig::new("Company ID")
            .order(1)
            .show_in_grid(false)
            .width(80)
            .hide_in_form(),
        pub company_name: String => FieldConfig::new("Company Name").order(2).required().max_length(100).width(200),
        pub short_code: Option<String> => FieldConfig::new("Short Code").order(3).max_length(50).width(100),
        pub company_address: Option<String> => FieldConfig::new("Company Address")
            .order(4)
            .show_in_grid(false)
            .kind(FieldKind::TextArea)
            .max_length(300),
        pub gst_no: Option<String> => FieldConfig::new("GST No")
            .order(5)
            .max_length(50)
            .pattern(GST_PATTERN)
            .message("Invalid GST Number format")
            .width(150),
        pub pan_no: Option<String> => FieldConfig::new("PAN No")
            .order(6)
            .max_length(50)
            .pattern(PAN_PATTERN)
            .message("Invalid PAN Number format")
            .width(120),
        pub phone_no: Option<String> => FieldConfig::new("Phone No").order(7).max_length(20).width(120),
        pub mobile_no: Option<String> => FieldConfig::new("Mobile No").order(8).max_length(20).width(120),
        pub mail: String => FieldConfig::new("Email")
            .order(9)
            .required()
            .email()
            .max_length(100)
            .width(200),
        pub mail_key: String => FieldConfig::new("Email Password/Key")
            .order(10)
            .required()
            .kind(FieldKind::Password)
            .max_length(100)
            .show_in_grid(false),
        pub start_date: Option<NaiveDate> => FieldConfig::new("Start Date")
            .order(11)
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .width(120),
        pub end_date: Option<NaiveDate> => FieldConfig::new("End Date")
            .order(12)
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .width(120),
        pub created_date: Option<NaiveDateTime> => FieldConfig::new("Created Date")
            .order(13)
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .read_only()
            .show_in_grid(false)
            .hide_in_form(),
        pub is_active: bool => FieldConfig::new("Active")
            .order(14)
            .kind(FieldKind::Checkbox)
            .template("StatusBadge")
            .width(100),
    }
}

impl Default for Company {
    fn default() -> Self {
        Self {
            company_id: RecordId::UNSAVED,
            company_name: String::new(),
            short_code: None,
            company_address: None,
            gst_no: None,
            pan_no: None,
            phone_no: None,
            mobile_no: None,
            mail: String::new(),
            mail_key: String::new(),
            start_date: None,
            end_date: None,
            created_date: None,
            is_active: true,
        }
    }
}

crate::keyed_by!(Company, company_id);
