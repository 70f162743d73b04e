//! Behavioural coverage for the cursor codec.

use std::cell::RefCell;

use pagination::{Cursor, CursorError, CursorKey};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct HistoryKey {
    member_id: String,
    sort_key: String,
}

impl CursorKey for HistoryKey {
    const SHAPE: &'static str = "booking-history";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionKey {
    day: i64,
    slot: String,
}

impl CursorKey for SessionKey {
    const SHAPE: &'static str = "session";
}

#[derive(Default)]
struct CodecWorld {
    history_key: Option<HistoryKey>,
    session_key: Option<SessionKey>,
    token: Option<String>,
    decoded: Option<Result<HistoryKey, CursorError>>,
}

type World = RefCell<CodecWorld>;

#[fixture]
fn world() -> World {
    RefCell::new(CodecWorld::default())
}

#[given("a history cursor key for member member-7")]
fn a_history_cursor_key(world: &World) {
    world.borrow_mut().history_key = Some(HistoryKey {
        member_id: "member-7".to_owned(),
        sort_key: "019000#0540#0600".to_owned(),
    });
}

#[given("a session cursor key")]
fn a_session_cursor_key(world: &World) {
    world.borrow_mut().session_key = Some(SessionKey {
        day: 19_000,
        slot: "0540#0600".to_owned(),
    });
}

#[given("a tampered token")]
fn a_tampered_token(world: &World) {
    world.borrow_mut().token = Some("eyJzaGFwZSI6ImJvb2tpbmctaGlzdG9yeSJ9~".to_owned());
}

#[when("the cursor is encoded")]
fn the_cursor_is_encoded(world: &World) {
    let mut state = world.borrow_mut();
    let token = if let Some(key) = state.history_key.clone() {
        Cursor::new(key).encode()
    } else {
        let key = state.session_key.clone().expect("a key was prepared");
        Cursor::new(key).encode()
    };
    state.token = Some(token.expect("encoding succeeds"));
}

#[when("the token is decoded as a history cursor")]
fn the_token_is_decoded(world: &World) {
    let mut state = world.borrow_mut();
    let token = state.token.clone().expect("a token was prepared");
    state.decoded = Some(Cursor::<HistoryKey>::decode(&token).map(Cursor::into_key));
}

#[then("the decoded key equals the original key")]
fn the_decoded_key_equals_the_original(world: &World) {
    let state = world.borrow();
    let decoded = state.decoded.clone().expect("decode ran");
    assert_eq!(decoded.ok(), state.history_key);
}

#[then("decoding fails with a shape mismatch")]
fn decoding_fails_with_shape_mismatch(world: &World) {
    let state = world.borrow();
    let decoded = state.decoded.clone().expect("decode ran");
    assert!(matches!(decoded, Err(CursorError::ShapeMismatch { .. })));
}

#[then("decoding fails")]
fn decoding_fails(world: &World) {
    let state = world.borrow();
    let decoded = state.decoded.clone().expect("decode ran");
    assert!(decoded.is_err());
}

#[scenario(
    path = "tests/features/cursor_codec.feature",
    name = "A cursor survives the round trip through its token"
)]
fn cursor_round_trip(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cursor_codec.feature",
    name = "A token minted for another collection is rejected"
)]
fn foreign_cursor_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cursor_codec.feature",
    name = "A tampered token is rejected"
)]
fn tampered_cursor_rejected(world: World) {
    let _ = world;
}
