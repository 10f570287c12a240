#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{diff, full_schema, index_identity, indexed, state, string_map};
use flatstate_core::{
    address, DiffFieldReader, FieldReadResult, FieldReader, FieldValue, InstanceDiff,
    MapFieldReader, ResourceAttrDiff, SchemaMap, Set,
};

fn expectations() -> Vec<(&'static str, Vec<String>, FieldReadResult)> {
    vec![
        (
            "bool",
            address(&["bool"]),
            FieldReadResult::present(FieldValue::Bool(true)),
        ),
        (
            "int",
            address(&["int"]),
            FieldReadResult::present(FieldValue::Int(42)),
        ),
        (
            "float",
            address(&["float"]),
            FieldReadResult::present(FieldValue::Float(1.25)),
        ),
        (
            "string",
            address(&["string"]),
            FieldReadResult::present(FieldValue::from("string")),
        ),
        (
            "list",
            address(&["list"]),
            FieldReadResult::present(FieldValue::List(vec!["foo".into(), "bar".into()])),
        ),
        (
            "listInt",
            address(&["listInt"]),
            FieldReadResult::present(FieldValue::List(vec![
                FieldValue::Int(21),
                FieldValue::Int(42),
            ])),
        ),
        (
            "map",
            address(&["map"]),
            FieldReadResult::present(string_map([("foo", "bar"), ("bar", "baz")])),
        ),
        (
            "mapElem",
            address(&["map", "foo"]),
            FieldReadResult::present(FieldValue::from("bar")),
        ),
        (
            "set",
            address(&["set"]),
            FieldReadResult::present(FieldValue::Set(Set::from_values(
                index_identity(),
                [FieldValue::Int(10), FieldValue::Int(50)],
            ))),
        ),
        (
            "setDeep",
            address(&["setDeep"]),
            FieldReadResult::present(FieldValue::Set(Set::from_values(
                index_identity(),
                [indexed(10, "foo"), indexed(50, "bar")],
            ))),
        ),
        (
            "listMap",
            address(&["listMap"]),
            FieldReadResult::present(FieldValue::List(vec![
                string_map([("foo", "bar"), ("bar", "baz")]),
                string_map([("baz", "baz")]),
            ])),
        ),
        (
            "absent",
            address(&["mapRemove"]),
            FieldReadResult::missing(&flatstate_core::Schema::map(
                flatstate_core::Schema::string(),
            )),
        ),
    ]
}

fn assert_conforms(reader: &dyn FieldReader) {
    for (name, addr, expected) in expectations() {
        let out = reader
            .read_field(&addr)
            .unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert_eq!(out, expected, "{}", name);
    }
}

fn list_map_state() -> [(&'static str, &'static str); 4] {
    [
        ("listMap.#", "2"),
        ("listMap.0.foo", "bar"),
        ("listMap.0.bar", "baz"),
        ("listMap.1.baz", "baz"),
    ]
}

fn full_diff() -> InstanceDiff {
    diff([
        ("bool", ResourceAttrDiff::change("", "true")),
        ("int", ResourceAttrDiff::change("", "42")),
        ("float", ResourceAttrDiff::change("", "1.25")),
        ("string", ResourceAttrDiff::change("", "string")),
        ("list.#", ResourceAttrDiff::change("0", "2")),
        ("list.0", ResourceAttrDiff::change("", "foo")),
        ("list.1", ResourceAttrDiff::change("", "bar")),
        ("listInt.#", ResourceAttrDiff::change("0", "2")),
        ("listInt.0", ResourceAttrDiff::change("", "21")),
        ("listInt.1", ResourceAttrDiff::change("", "42")),
        ("map.foo", ResourceAttrDiff::change("", "bar")),
        ("map.bar", ResourceAttrDiff::change("", "baz")),
        ("set.#", ResourceAttrDiff::change("0", "2")),
        ("set.10", ResourceAttrDiff::change("", "10")),
        ("set.50", ResourceAttrDiff::change("", "50")),
        ("setDeep.#", ResourceAttrDiff::change("0", "2")),
        ("setDeep.10.index", ResourceAttrDiff::change("", "10")),
        ("setDeep.10.value", ResourceAttrDiff::change("", "foo")),
        ("setDeep.50.index", ResourceAttrDiff::change("", "50")),
        ("setDeep.50.value", ResourceAttrDiff::change("", "bar")),
    ])
}

#[test]
fn test_map_reader_conforms() {
    let schema: SchemaMap = full_schema();
    let source = MapFieldReader::new(
        &schema,
        state([
            ("bool", "true"),
            ("int", "42"),
            ("float", "1.25"),
            ("string", "string"),
            ("list.#", "2"),
            ("list.0", "foo"),
            ("list.1", "bar"),
            ("listInt.#", "2"),
            ("listInt.0", "21"),
            ("listInt.1", "42"),
            ("map.foo", "bar"),
            ("map.bar", "baz"),
            ("set.#", "2"),
            ("set.10", "10"),
            ("set.50", "50"),
            ("setDeep.#", "2"),
            ("setDeep.10.index", "10"),
            ("setDeep.10.value", "foo"),
            ("setDeep.50.index", "50"),
            ("setDeep.50.value", "bar"),
            ("listMap.#", "2"),
            ("listMap.0.foo", "bar"),
            ("listMap.0.bar", "baz"),
            ("listMap.1.baz", "baz"),
        ]),
    );
    assert_conforms(&source);
}

#[test]
fn test_diff_reader_conforms_over_sparse_source() {
    let schema = full_schema();
    let source = MapFieldReader::new(&schema, state(list_map_state()));
    let d = full_diff();
    let r = DiffFieldReader::new(&schema, &d, &source);
    assert_conforms(&r);
}

#[test]
fn test_stacked_overlays_conform() {
    let schema = full_schema();
    let source = MapFieldReader::new(&schema, state(list_map_state()));
    let d = full_diff();
    let lower = DiffFieldReader::new(&schema, &d, &source);
    let empty = InstanceDiff::new();
    let upper = DiffFieldReader::new(&schema, &empty, &lower);
    assert_conforms(&upper);
}
