#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::full_schema;
use flatstate_core::errors::FieldError;
use flatstate_core::logging_facility::test_capture::init_test_capture;
use flatstate_core::{
    address, BasicMapReader, DiffFieldReader, InstanceDiff, MapFieldReader,
    MultiLevelFieldReader, ResourceAttrDiff,
};
use flatstate_core::{log_op_end, log_op_error, log_op_start};
use flatstate_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ADDRESS, FIELD_COMPONENT, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = FieldError::UnknownLevel {
        level: "config".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(
        error_event.fields.get(FIELD_ERR_CODE),
        Some(&"ERR_INVALID_INPUT".to_string())
    );
}

#[test]
fn test_merge_read_emits_start_and_end() {
    let capture = init_test_capture();
    let schema = full_schema();
    let state = MapFieldReader::new(&schema, BasicMapReader::from_iter([("int", "1")]));
    let d = InstanceDiff::new().attr("int", ResourceAttrDiff::change("1", "5"));
    let planned = DiffFieldReader::new(&schema, &d, &state);

    let mut multi = MultiLevelFieldReader::new(&schema, ["state", "diff"]);
    multi.set_level("state", &state).unwrap();
    multi.set_level("diff", &planned).unwrap();

    multi.read_field_merge(&address(&["int"]), "diff").unwrap();

    let starts = capture.events_where("read_field_merge", EVENT_START, FIELD_ADDRESS, "int");
    let ends = capture.events_where("read_field_merge", EVENT_END, FIELD_ADDRESS, "int");
    assert!(!starts.is_empty());
    assert!(!ends.is_empty());
    assert!(starts.iter().all(|e| e
        .fields
        .get(FIELD_COMPONENT)
        .is_some_and(|c| c.starts_with("flatstate_core"))));
    assert!(ends.iter().all(|e| e.fields.contains_key(FIELD_DURATION_MS)));
    assert!(ends
        .iter()
        .any(|e| e.fields.get("exists") == Some(&"true".to_string())));
}

#[test]
fn test_merge_read_failure_emits_error_code() {
    let capture = init_test_capture();
    let schema = full_schema();
    let state = MapFieldReader::new(&schema, BasicMapReader::default());
    let mut multi = MultiLevelFieldReader::new(&schema, ["state"]);
    multi.set_level("state", &state).unwrap();

    let unknown = "no_such_field_unique_4";
    let err = multi
        .read_field_merge(&address(&[unknown]), "state")
        .unwrap_err();
    assert!(err.is_address_error());

    let errors = capture.events_where("read_field_merge", EVENT_END_ERROR, FIELD_ADDRESS, unknown);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_INVALID_ADDRESS".to_string())
    );
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_KIND),
        Some(&"InvalidAddress".to_string())
    );
    assert!(capture
        .events_where("read_field_merge", EVENT_END, FIELD_ADDRESS, unknown)
        .is_empty());
}

#[test]
fn test_sensitive_payload_never_logged() {
    let capture = init_test_capture();
    let schema = full_schema();
    let state = MapFieldReader::new(&schema, BasicMapReader::default());
    let secret = "hunter2-unique-5";
    let d = InstanceDiff::new().attr("password", ResourceAttrDiff::change("", secret));
    let r = DiffFieldReader::new(&schema, &d, &state);

    use flatstate_core::FieldReader;
    let out = r.read_field(&address(&["password"])).unwrap();
    assert_eq!(out.value.as_str(), Some(secret));

    assert!(capture
        .events()
        .iter()
        .all(|e| e.fields.values().all(|v| !v.contains(secret))));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
