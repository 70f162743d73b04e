//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_argument("bad"), ErrorCode::InvalidArgument)]
#[case(Error::invalid_cursor("bad"), ErrorCode::InvalidCursor)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::store_unavailable("down"), ErrorCode::StoreUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidArgument, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_message_for_blank_input() {
    let error = Error::new(ErrorCode::Conflict, "");
    assert_eq!(error.message(), "conflict");
}

#[rstest]
fn serialises_code_in_snake_case() {
    let error = Error::store_unavailable("table offline");
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({ "code": "store_unavailable", "message": "table offline" })
    );
}

#[rstest]
fn round_trips_details_through_serde() {
    let error = Error::conflict("already booked").with_details(json!({ "memberId": "m-1" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}
