use transerp_metadata::{metadata_for, Record};

/// Fresh record carrying only the fields its metadata enumerates.
///
/// State outside the declared field table stays at its default; this is the
/// copy an edit form works on.
pub fn clone_by_metadata<R: Record>(source: &R) -> R {
    let meta = metadata_for::<R>();
    let mut copy = R::default();
    for field in meta.fields() {
        let copied = meta
            .get(source, field.name)
            .and_then(|value| meta.set(&mut copy, field.name, value));
        if let Err(err) = copied {
            tracing::warn!(record = R::TYPE_NAME, field = field.name, error = %err, "field not copied");
        }
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use transerp_metadata::{FieldDef, FieldType, FieldValue, ValueError};

    /// A record with bookkeeping the field table does not expose.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Driver {
        id: i32,
        name: String,
        joined: Option<NaiveDate>,
        dirty: bool,
    }

    impl Record for Driver {
        const TYPE_NAME: &'static str = "Driver";

        fn field_defs() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef {
                    name: "id",
                    value_type: i32::VALUE_TYPE,
                    config: None,
                    get: |d: &Self| d.id.to_value(),
                    set: |d: &mut Self, v: FieldValue| -> Result<(), ValueError> {
                        d.id = i32::from_value(v)?;
                        Ok(())
                    },
                },
                FieldDef {
                    name: "name",
                    value_type: String::VALUE_TYPE,
                    config: None,
                    get: |d: &Self| d.name.to_value(),
                    set: |d: &mut Self, v: FieldValue| -> Result<(), ValueError> {
                        d.name = String::from_value(v)?;
                        Ok(())
                    },
                },
                FieldDef {
                    name: "joined",
                    value_type: <Option<NaiveDate>>::VALUE_TYPE,
                    config: None,
                    get: |d: &Self| d.joined.to_value(),
                    set: |d: &mut Self, v: FieldValue| -> Result<(), ValueError> {
                        d.joined = <Option<NaiveDate>>::from_value(v)?;
                        Ok(())
                    },
                },
            ]
        }
    }

    #[test]
    fn copies_enumerated_fields_only() {
        let source = Driver {
            id: 9,
            name: "Suresh".into(),
            joined: NaiveDate::from_ymd_opt(2023, 4, 1),
            dirty: true,
        };
        let copy = clone_by_metadata(&source);

        let meta = metadata_for::<Driver>();
        for field in meta.fields() {
            assert_eq!(
                meta.get(&copy, field.name).unwrap(),
                meta.get(&source, field.name).unwrap(),
                "field {}",
                field.name
            );
        }
        assert!(!copy.dirty);
        assert_ne!(copy, source);
    }

    transerp_metadata::crud_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Note {
            id: i32,
            remarks: Option<String>,
        }
    }

    #[test]
    fn blank_optional_text_survives_the_copy() {
        for remarks in [Some(String::new()), Some("  ".to_string()), None] {
            let source = Note {
                id: 3,
                remarks: remarks.clone(),
            };
            assert_eq!(clone_by_metadata(&source), source, "remarks {remarks:?}");
        }
    }
}
