//! Grid and form generated from one record declaration.

use transerp_forms::{grid_columns, Control, EditForm, TextInput};
use transerp_metadata::{crud_record, metadata_for, FieldConfig, FieldKind};

crud_record! {
    #[derive(Debug, Clone, Default)]
    struct Depot {
        id: i32 => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
        name: String => FieldConfig::new("Name").order(2).required(),
        active: bool => FieldConfig::new("Active").order(3).kind(FieldKind::Checkbox),
    }
}

#[test]
fn hidden_id_is_in_neither_view() {
    let meta = metadata_for::<Depot>();

    let columns: Vec<_> = grid_columns(meta.fields()).into_iter().map(|c| c.field).collect();
    assert_eq!(columns, ["name", "active"]);

    let controls = EditForm::<Depot>::blank().controls();
    assert_eq!(controls.len(), 2);

    assert_eq!(controls[0].field, "name");
    assert!(controls[0].required);
    assert!(matches!(
        controls[0].control,
        Control::Text {
            input: TextInput::Plain,
            ..
        }
    ));

    assert_eq!(controls[1].field, "active");
    assert!(!controls[1].required);
    assert!(matches!(controls[1].control, Control::Checkbox { .. }));
}

#[test]
fn controls_serialize_with_a_control_tag() {
    let controls = EditForm::<Depot>::blank().controls();
    let json = serde_json::to_value(&controls[1]).unwrap();
    assert_eq!(json["control"]["control"], "checkbox");
    assert_eq!(json["label"], "Active");
}
