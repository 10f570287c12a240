#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::full_schema;
use flatstate_core::errors::{ExError, ExErrorKind, FieldError};
use flatstate_core::schema::addr_to_schema;
use flatstate_core::{
    address, BasicMapReader, DiffFieldReader, FieldReader, InstanceDiff, MapFieldReader,
    ResourceAttrDiff, Schema, SchemaMap, ValueType,
};

#[test]
fn test_unknown_field_is_invalid_address() {
    let schema = full_schema();
    let err = addr_to_schema(&address(&["missing"]), &schema).unwrap_err();

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidAddress);
    assert_eq!(ex.code(), "ERR_INVALID_ADDRESS");
    assert_eq!(ex.address(), Some("missing"));
}

#[test]
fn test_traversal_below_scalar_is_invalid_address() {
    let schema = full_schema();
    let err = addr_to_schema(&address(&["int", "x"]), &schema).unwrap_err();
    assert!(matches!(
        err,
        FieldError::InvalidTraversal {
            kind: ValueType::Int,
            ..
        }
    ));
    assert_eq!(ExError::from(err).code(), "ERR_INVALID_ADDRESS");
}

#[test]
fn test_decode_error_names_flat_key() {
    let schema = full_schema();
    let source = MapFieldReader::new(&schema, BasicMapReader::default());
    let d = InstanceDiff::new()
        .attr("listInt.0", ResourceAttrDiff::change("", "1"))
        .attr("listInt.1", ResourceAttrDiff::change("", "forty-two"));
    let r = DiffFieldReader::new(&schema, &d, &source);

    let err = r.read_field(&address(&["listInt"])).unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.code(), "ERR_DECODE");
    assert_eq!(ex.key(), Some("listInt.1"));
    assert!(ex.message().contains("forty-two"));
}

#[test]
fn test_non_integer_set_identity_is_decode_error() {
    let schema = full_schema();
    let source = MapFieldReader::new(&schema, BasicMapReader::from_iter([("set.abc", "1")]));

    let err = source.read_field(&address(&["set"])).unwrap_err();
    assert!(matches!(err, FieldError::InvalidIdentity { .. }));
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Decode);
}

#[test]
fn test_malformed_containers_are_schema_errors() {
    let mut schema = SchemaMap::new();
    schema.insert("bare_list".to_string(), Schema::new(ValueType::List));
    schema.insert(
        "bare_set".to_string(),
        Schema::new(ValueType::Set).with_elem(Schema::int()),
    );
    schema.insert(
        "nested_map".to_string(),
        Schema::map(Schema::list(Schema::string())),
    );

    for (field, code) in [
        ("bare_list", "ERR_INVALID_SCHEMA"),
        ("bare_set", "ERR_INVALID_SCHEMA"),
        ("nested_map", "ERR_INVALID_SCHEMA"),
    ] {
        let err = addr_to_schema(&address(&[field]), &schema).unwrap_err();
        assert!(err.is_schema_error(), "{}", field);
        assert_eq!(ExError::from(err).code(), code);
    }
}

#[test]
fn test_errors_fail_whole_read() {
    let schema = full_schema();
    let source = MapFieldReader::new(
        &schema,
        BasicMapReader::from_iter([("map.ok", "fine"), ("bool", "perhaps")]),
    );
    assert!(source.read_field(&address(&["bool"])).is_err());
    assert!(source.read_field(&address(&["map"])).is_ok());
}

#[test]
fn test_oversized_list_count_is_decode_error() {
    let schema = full_schema();
    let source = MapFieldReader::new(
        &schema,
        BasicMapReader::from_iter([("list.#", "100000000000000000"), ("list.0", "a")]),
    );
    let d = InstanceDiff::new();
    let r = DiffFieldReader::new(&schema, &d, &source);

    let ex: ExError = r.read_field(&address(&["list"])).unwrap_err().into();
    assert_eq!(ex.code(), "ERR_DECODE");
    assert_eq!(ex.key(), Some("list.#"));
}

#[test]
fn test_display_is_stable() {
    let err = FieldError::Decode {
        key: "int".to_string(),
        expected: ValueType::Int,
        raw: "x".to_string(),
    };
    let shown = ExError::from(err).with_op("read_field").to_string();
    assert!(shown.starts_with("[ERR_DECODE] in operation 'read_field'"));
    assert!(shown.ends_with("(key: int)"));
}
