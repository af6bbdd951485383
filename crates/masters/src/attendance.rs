//! Daily student attendance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use transerp_core::RecordId;
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StudentAttendance {
        pub attendance_id: RecordId => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
        pub student_id: RecordId => FieldConfig::new("Student")
            .order(2)
            .required()
            .kind(FieldKind::Dropdown)
            .source("students")
            .range(1.0, f64::from(i32::MAX))
            .width(200),
        pub attendance_date: NaiveDate => FieldConfig::new("Date")
            .order(3)
            .required()
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .width(130),
        pub is_present: bool => FieldConfig::new("Present")
            .order(4)
            .kind(FieldKind::Checkbox)
            .template("StatusBadge")
            .width(100),
        /// Display name joined from the student row; never stored.
        pub student_name: Option<String> => FieldConfig::new("Student Name")
            .order(5)
            .read_only()
            .hide_in_form()
            .width(200),
    }
}

crate::keyed_by!(StudentAttendance, attendance_id);
