//! Concurrent reservations never oversubscribe a session.
//!
//! A reservation is a single conditional write, so racing members can lose
//! while seats remain. `reserve_until_settled` is the caller-side retry loop
//! that re-reads the session before every attempt; with it the accepted count
//! equals the capacity exactly.

use std::sync::Arc;

use booking::domain::ports::{
    BookingCommand, HistoryLedger, ReserveRequest, ReserveResponse, SessionAdminCommand,
    SessionRepository,
};
use booking::domain::{
    BookingService, Error, ErrorCode, HistorySortKey, Member, MemberId, SessionAdminService,
    SessionDay, SessionDraft, SessionKey, TimeSlot,
};
use booking::outbound::kv_store::InMemoryKeyValueStore;
use booking::outbound::persistence::{KvHistoryLedger, KvSessionRepository};
use pagination::PageLimit;
use rstest::rstest;

type Sessions = KvSessionRepository<InMemoryKeyValueStore>;
type History = KvHistoryLedger<InMemoryKeyValueStore>;
type Engine = BookingService<Sessions, History>;

struct Deployment {
    sessions: Arc<Sessions>,
    history: Arc<History>,
    engine: Arc<Engine>,
}

fn session_key() -> SessionKey {
    SessionKey::new(
        SessionDay::from_epoch_day(19_000).expect("valid day"),
        TimeSlot::new(540, 600).expect("valid slot"),
    )
}

async fn deploy(capacity: u32) -> Deployment {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let sessions = Arc::new(KvSessionRepository::new(Arc::clone(&store), "sessions"));
    let history = Arc::new(KvHistoryLedger::new(store, "session-history"));
    SessionAdminService::new(Arc::clone(&sessions))
        .create_session(SessionDraft {
            key: session_key(),
            title: "Spin".to_owned(),
            description: "Intervals".to_owned(),
            coach: "Rae".to_owned(),
            capacity,
        })
        .await
        .expect("session is created");
    let engine = Arc::new(BookingService::new(
        Arc::clone(&sessions),
        Arc::clone(&history),
    ));
    Deployment {
        sessions,
        history,
        engine,
    }
}

fn racer(n: u32) -> Member {
    let member_id = MemberId::new(format!("member-{n}")).expect("valid id");
    Member::new(member_id, format!("Member {n}")).expect("valid member")
}

async fn reserve_until_settled(
    engine: &Engine,
    sessions: &Sessions,
    member: Member,
) -> Result<ReserveResponse, Error> {
    loop {
        let request = ReserveRequest {
            member: member.clone(),
            session: session_key(),
        };
        match engine.reserve(request).await {
            Err(error) if error.code() == ErrorCode::Conflict => {
                let snapshot = sessions
                    .get_by_key(session_key())
                    .await
                    .expect("lookup succeeds")
                    .expect("session exists");
                if !snapshot.has_free_seat() || snapshot.is_booked(member.id()) {
                    return Err(error);
                }
                tokio::task::yield_now().await;
            }
            outcome => return outcome,
        }
    }
}

async fn race(deployment: &Deployment, attempts: u32, settle: bool) -> (Vec<MemberId>, u32) {
    let handles: Vec<_> = (0..attempts)
        .map(|n| {
            let engine = Arc::clone(&deployment.engine);
            let sessions = Arc::clone(&deployment.sessions);
            tokio::spawn(async move {
                let member = racer(n);
                let member_id = member.id().clone();
                let outcome = if settle {
                    reserve_until_settled(&engine, &sessions, member).await
                } else {
                    engine
                        .reserve(ReserveRequest {
                            member,
                            session: session_key(),
                        })
                        .await
                };
                (member_id, outcome)
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        let (member_id, outcome) = handle.await.expect("task completes");
        match outcome {
            Ok(response) => {
                assert!(!response.history.is_diverged());
                winners.push(member_id);
            }
            Err(error) => {
                assert_eq!(error.code(), ErrorCode::Conflict, "unexpected: {error}");
                conflicts += 1;
            }
        }
    }
    (winners, conflicts)
}

async fn assert_roster_matches(deployment: &Deployment, winners: &[MemberId]) {
    let stored = deployment
        .sessions
        .get_by_key(session_key())
        .await
        .expect("lookup succeeds")
        .expect("session exists");
    assert_eq!(
        stored.participants().len(),
        u32::try_from(winners.len()).expect("small")
    );
    for member_id in winners {
        assert!(stored.is_booked(member_id));
        let page = deployment
            .history
            .list_by_member(member_id, None, PageLimit::DEFAULT)
            .await
            .expect("history lists");
        assert_eq!(page.items.len(), 1);
        assert_eq!(
            page.items[0].sort_key(),
            &HistorySortKey::from(session_key())
        );
    }
}

#[rstest]
#[case(1, 8)]
#[case(3, 20)]
#[case(5, 5)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn settled_reservations_fill_exactly_the_capacity(
    #[case] capacity: u32,
    #[case] attempts: u32,
) {
    let deployment = deploy(capacity).await;

    let (winners, conflicts) = race(&deployment, attempts, true).await;

    let expected = capacity.min(attempts);
    assert_eq!(u32::try_from(winners.len()).expect("small"), expected);
    assert_eq!(conflicts, attempts - expected);
    assert_roster_matches(&deployment, &winners).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_attempts_never_oversubscribe() {
    let deployment = deploy(3).await;

    let (winners, conflicts) = race(&deployment, 32, false).await;

    assert!(!winners.is_empty());
    assert!(winners.len() <= 3);
    assert_eq!(u32::try_from(winners.len()).expect("small") + conflicts, 32);
    assert_roster_matches(&deployment, &winners).await;
}
