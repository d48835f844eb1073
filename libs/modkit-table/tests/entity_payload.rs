#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Entities built the way the table functional suite builds them, pushed
//! through the payload encoder and back.

use chrono::{TimeZone, Utc};
use modkit_table::{
    EdmType, Entity, Error, PARTITION_KEY, Property, ROW_KEY, Value, decode_entity, encode_entity,
};

fn all_types_entity() -> Entity {
    let stamp = Utc.with_ymd_and_hms(2012, 1, 26, 18, 26, 19).unwrap()
        + chrono::Duration::nanoseconds(47_300);

    let mut e = Entity::with_keys("key1", "key2");
    e.add_property("BINARY", Some(EdmType::Binary), vec![0_u8, 1, 2, 3, 4]).unwrap();
    e.add_property("BOOLEAN", Some(EdmType::Boolean), true).unwrap();
    e.add_property("DATETIME", Some(EdmType::DateTime), stamp).unwrap();
    e.add_property("DOUBLE", Some(EdmType::Double), 2.3456).unwrap();
    e.add_property("GUID", Some(EdmType::Guid), "90ab64d6-d3f8-49ec-b837-b8b5b6367b74").unwrap();
    e.add_property("INT32", Some(EdmType::Int32), 23).unwrap();
    e.add_property("INT64", Some(EdmType::Int64), "-1").unwrap();
    e.add_property("STRING", Some(EdmType::String), "Some unicode: \u{B2E4}\u{B974}").unwrap();
    e
}

fn decode_rows(rows: &[modkit_table::EncodedProperty]) -> Entity {
    decode_entity(
        rows.iter()
            .map(|r| (r.name.as_str(), Some(r.edm_type.as_str()), r.text.as_deref())),
    )
    .unwrap()
}

#[test]
fn test_minimal_entity_enumerates_in_order() {
    let mut e = Entity::new();
    e.set_partition_key("p");
    e.set_row_key("r");
    e.add_property("n", Some(EdmType::Int32), 23).unwrap();

    let rows = encode_entity(&e).unwrap();
    let got: Vec<_> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.text.as_deref()))
        .collect();
    assert_eq!(
        got,
        [(PARTITION_KEY, Some("p")), (ROW_KEY, Some("r")), ("n", Some("23"))]
    );
}

#[test]
fn test_every_type_roundtrips() {
    let e = all_types_entity();
    let rows = encode_entity(&e).unwrap();

    let text = |name: &str| {
        rows.iter()
            .find(|r| r.name == name)
            .and_then(|r| r.text.clone())
            .unwrap()
    };
    assert_eq!(text("BINARY"), "AAECAwQ=");
    assert_eq!(text("BOOLEAN"), "true");
    assert_eq!(text("DATETIME"), "2012-01-26T18:26:19.0000473Z");
    assert_eq!(text("INT64"), "-1");

    assert_eq!(decode_rows(&rows), e);
}

#[test]
fn test_null_values_roundtrip() {
    let mut e = Entity::with_keys("key1", "key2");
    for ty in EdmType::ALL {
        e.add_property(ty.as_str().trim_start_matches("Edm."), Some(ty), Value::Null)
            .unwrap();
    }
    let rows = encode_entity(&e).unwrap();
    assert_eq!(rows.iter().filter(|r| r.is_null()).count(), EdmType::ALL.len());
    assert_eq!(decode_rows(&rows), e);
}

#[test]
fn test_integer_boundaries_roundtrip() {
    let mut e = Entity::with_keys("key1", "key2");
    e.add_property("i32max", Some(EdmType::Int32), i32::MAX).unwrap();
    e.add_property("i32min", Some(EdmType::Int32), i32::MIN).unwrap();
    e.add_property("i64max", Some(EdmType::Int64), "9223372036854775807").unwrap();
    e.add_property("i64min", Some(EdmType::Int64), "-9223372036854775808").unwrap();

    let rows = encode_entity(&e).unwrap();
    assert_eq!(rows[2].text.as_deref(), Some("2147483647"));
    assert_eq!(rows[3].text.as_deref(), Some("-2147483648"));
    assert_eq!(rows[4].text.as_deref(), Some("9223372036854775807"));
    assert_eq!(rows[5].text.as_deref(), Some("-9223372036854775808"));
    assert_eq!(decode_rows(&rows), e);
}

#[test]
fn test_bad_values_are_rejected() {
    let bad: [(EdmType, Value); 9] = [
        (EdmType::Boolean, Value::from("BOO!")),
        (EdmType::DateTime, Value::Bool(true)),
        (EdmType::DateTime, Value::Int(0)),
        (EdmType::DateTime, Value::from(Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap())),
        (EdmType::Double, Value::from("ABCDEFGH-D3F8-49EC-B837-B8B5B6367B74")),
        (EdmType::Guid, Value::from("ABCDEFGH-D3F8-49EC-B837-B8B5B6367B74")),
        (EdmType::Int32, Value::Int(i64::from(i32::MAX) + 1)),
        (EdmType::Int64, Value::from("9223372036854775808")),
        (EdmType::Binary, Value::Int(12_345)),
    ];
    for (ty, value) in bad {
        let err = Property::create("p", Some(ty), value).unwrap_err();
        assert!(matches!(err, Error::Validation { edm_type, .. } if edm_type == ty));
    }
}

#[test]
fn test_entities_without_keys_are_not_encoded() {
    let mut only_row = Entity::new();
    only_row.set_row_key("r");
    let mut only_partition = Entity::new();
    only_partition.set_partition_key("p");

    for e in [Entity::new(), only_row, only_partition] {
        assert!(matches!(encode_entity(&e), Err(Error::MissingKey(_))));
    }
}
