//! Tests for the schedule query service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockall::predicate::eq;
use pagination::Page;
use rstest::rstest;

use super::*;
use crate::domain::ports::{HistoryLedgerError, MockHistoryLedger, MockSessionRepository};
use crate::domain::{
    BookingHistoryEntry, ErrorCode, Member, Participants, SessionDraft, SessionKey, TimeSlot,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2022, 1, 8, 10, 30, 0)
            .single()
            .expect("valid timestamp"),
    })
}

fn day(epoch_day: i64) -> SessionDay {
    SessionDay::from_epoch_day(epoch_day).expect("valid day")
}

fn member_id(id: &str) -> MemberId {
    MemberId::new(id).expect("valid id")
}

fn session(epoch_day: i64, start: u16, members: &[&str]) -> Session {
    let roster = Participants::from_members(
        members
            .iter()
            .map(|id| Member::new(member_id(id), "Someone").expect("valid member")),
    )
    .expect("roster fits");
    Session::restore(
        SessionDraft {
            key: SessionKey::new(
                day(epoch_day),
                TimeSlot::new(start, start + 60).expect("valid slot"),
            ),
            title: format!("Session at {start}"),
            description: String::new(),
            coach: "Lee".to_owned(),
            capacity: 4,
        },
        roster,
    )
}

fn history_entry(owner: &str, epoch_day: i64) -> BookingHistoryEntry {
    let id = member_id(owner);
    let view = session(epoch_day, 540, &[owner]).to_external_view(&id);
    BookingHistoryEntry::new(id, view)
}

fn service(
    repo: MockSessionRepository,
    ledger: MockHistoryLedger,
) -> ScheduleQueryService<MockSessionRepository, MockHistoryLedger> {
    ScheduleQueryService::new(Arc::new(repo), Arc::new(ledger), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn day_listing_projects_per_member_in_slot_order() {
    let mut repo = MockSessionRepository::new();
    repo.expect_get_by_day()
        .with(eq(day(19_000)))
        .times(1)
        .return_once(|_| Ok(vec![session(19_000, 600, &[]), session(19_000, 480, &["a"])]));

    let listed = service(repo, MockHistoryLedger::new())
        .sessions_for_day(&member_id("a"), day(19_000))
        .await
        .expect("listing succeeds");

    let starts: Vec<u16> = listed.iter().map(|s| s.slot().start_minute()).collect();
    assert_eq!(starts, [480, 600]);
    assert_eq!(
        listed.iter().map(ExternalSession::is_booked).collect::<Vec<_>>(),
        [true, false]
    );
}

#[rstest]
#[tokio::test]
async fn week_listing_covers_monday_to_sunday() {
    let mut repo = MockSessionRepository::new();
    repo.expect_get_by_day().times(7).returning(|requested| {
        if requested.epoch_day() == 18_997 {
            Ok(vec![session(18_997, 540, &[])])
        } else {
            Ok(Vec::new())
        }
    });

    let week = service(repo, MockHistoryLedger::new())
        .sessions_for_week(&member_id("a"), day(19_000))
        .await
        .expect("listing succeeds");

    let days: Vec<i64> = week.keys().map(|d| d.epoch_day()).collect();
    assert_eq!(days, (18_995..=19_001).collect::<Vec<_>>());
    assert_eq!(week.get(&day(18_997)).map(Vec::len), Some(1));
    assert_eq!(week.get(&day(19_000)).map(Vec::len), Some(0));
}

#[rstest]
#[tokio::test]
async fn current_week_follows_the_clock() {
    let mut repo = MockSessionRepository::new();
    repo.expect_get_by_day()
        .times(7)
        .returning(|_| Ok(Vec::new()));

    let week = service(repo, MockHistoryLedger::new())
        .sessions_this_week(&member_id("a"))
        .await
        .expect("listing succeeds");

    assert_eq!(week.keys().next().map(|d| d.epoch_day()), Some(18_995));
}

#[rstest]
#[tokio::test]
async fn day_listing_surfaces_store_outages() {
    let mut repo = MockSessionRepository::new();
    repo.expect_get_by_day().times(1).return_once(|_| {
        Err(crate::domain::ports::SessionRepositoryError::connection(
            "timeout",
        ))
    });

    let error = service(repo, MockHistoryLedger::new())
        .sessions_for_day(&member_id("a"), day(19_000))
        .await
        .expect_err("store unavailable");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}

#[rstest]
#[tokio::test]
async fn first_history_page_returns_a_cursor_when_more_remain() {
    let last = history_entry("a", 19_000);
    let next_key = last.cursor_key();
    let mut ledger = MockHistoryLedger::new();
    ledger
        .expect_list_by_member()
        .withf(|member, after, limit| {
            member.as_ref() == "a" && after.is_none() && limit.get() == 10
        })
        .times(1)
        .return_once(move |_, _, _| Ok(Page::new(vec![last], Some(next_key))));

    let response = service(MockSessionRepository::new(), ledger)
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor: None,
            limit: None,
        })
        .await
        .expect("listing succeeds");

    assert_eq!(response.entries.len(), 1);
    let token = response.cursor.expect("more pages remain");
    let decoded = Cursor::<HistoryCursorKey>::decode(&token).expect("valid token");
    assert_eq!(decoded.key().sort_key.as_str(), "019000#0540#0600");
}

#[rstest]
#[tokio::test]
async fn history_cursor_resumes_after_its_key() {
    let token = Cursor::new(history_entry("a", 19_000).cursor_key())
        .encode()
        .expect("encode");
    let mut ledger = MockHistoryLedger::new();
    ledger
        .expect_list_by_member()
        .withf(|_, after, limit| {
            after
                .as_ref()
                .is_some_and(|key| key.as_str() == "019000#0540#0600")
                && limit.get() == 5
        })
        .times(1)
        .return_once(|_, _, _| Ok(Page::empty()));

    let response = service(MockSessionRepository::new(), ledger)
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor: Some(token),
            limit: Some(5),
        })
        .await
        .expect("listing succeeds");

    assert!(response.entries.is_empty());
    assert!(response.cursor.is_none());
}

#[rstest]
#[tokio::test]
async fn configured_default_page_size_applies() {
    let mut ledger = MockHistoryLedger::new();
    ledger
        .expect_list_by_member()
        .withf(|_, _, limit| limit.get() == 25)
        .times(1)
        .return_once(|_, _, _| Ok(Page::empty()));

    let query = service(MockSessionRepository::new(), ledger)
        .with_default_page_size(PageLimit::new(25).expect("valid limit"));
    query
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor: None,
            limit: None,
        })
        .await
        .expect("listing succeeds");
}

#[rstest]
#[case(Some("garbage!".to_owned()))]
#[case(Some(String::new()))]
#[case(Some(
    Cursor::new(history_entry("someone-else", 19_000).cursor_key())
        .encode()
        .expect("encode")
))]
#[tokio::test]
async fn unusable_cursors_are_rejected(#[case] cursor: Option<String>) {
    let mut ledger = MockHistoryLedger::new();
    ledger.expect_list_by_member().times(0);

    let error = service(MockSessionRepository::new(), ledger)
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor,
            limit: None,
        })
        .await
        .expect_err("cursor rejected");

    assert_eq!(error.code(), ErrorCode::InvalidCursor);
}

#[rstest]
#[case(0)]
#[case(101)]
#[tokio::test]
async fn out_of_range_page_sizes_are_rejected(#[case] limit: u32) {
    let mut ledger = MockHistoryLedger::new();
    ledger.expect_list_by_member().times(0);

    let error = service(MockSessionRepository::new(), ledger)
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor: None,
            limit: Some(limit),
        })
        .await
        .expect_err("limit rejected");

    assert_eq!(error.code(), ErrorCode::InvalidArgument);
}

#[rstest]
#[tokio::test]
async fn history_listing_surfaces_ledger_outages() {
    let mut ledger = MockHistoryLedger::new();
    ledger
        .expect_list_by_member()
        .times(1)
        .return_once(|_, _, _| Err(HistoryLedgerError::connection("reset")));

    let error = service(MockSessionRepository::new(), ledger)
        .list_history(ListHistoryRequest {
            member_id: member_id("a"),
            cursor: None,
            limit: None,
        })
        .await
        .expect_err("ledger unavailable");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}
