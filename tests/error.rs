use serde_json::Value;
use taskflow::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    let err = Error::InvalidArgument("bad input".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn exit_code_not_found() {
    assert_eq!(
        Error::TaskNotFound("t1".to_string()).exit_code(),
        exit_codes::NOT_FOUND
    );
    assert_eq!(
        Error::CategoryNotFound("c1".to_string()).exit_code(),
        exit_codes::NOT_FOUND
    );
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::OperationFailed("boom".to_string());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn kind_follows_exit_code() {
    assert_eq!(Error::InvalidConfig("x".to_string()).kind(), "user_error");
    assert_eq!(Error::TaskNotFound("t".to_string()).kind(), "not_found");
    assert_eq!(Error::OperationFailed("x".to_string()).kind(), "operation_failed");
}

#[test]
fn not_found_messages_name_the_record() {
    assert_eq!(
        Error::TaskNotFound("abc".to_string()).to_string(),
        "Task not found: abc"
    );
    assert_eq!(
        Error::CategoryNotFound("xyz".to_string()).to_string(),
        "Category not found: xyz"
    );
}

#[test]
fn details_include_record_and_id() {
    let err = Error::TaskNotFound("abc".to_string());
    let details = err.details().expect("details");
    assert_eq!(details["record"], Value::String("task".to_string()));
    assert_eq!(details["id"], Value::String("abc".to_string()));
    assert!(Error::InvalidArgument("x".to_string()).details().is_none());
}

#[test]
fn json_error_includes_details() {
    let err = Error::CategoryNotFound("work".to_string());
    let json = JsonError::from(&err);
    let value = serde_json::to_value(&json).expect("serialize");

    assert_eq!(value["code"], Value::from(exit_codes::NOT_FOUND));
    assert_eq!(value["details"]["record"], "category");
    assert_eq!(value["message"], "Category not found: work");
    assert_eq!(value["kind"], "not_found");
}
