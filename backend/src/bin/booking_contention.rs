//! Fire concurrent reservations at one session and report how many landed.
//!
//! The session is seeded in the in-memory store, so the run exercises the
//! conditional roster write without external infrastructure. Accepted
//! reservations never exceed the configured capacity.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use booking::BookingSettings;
use booking::domain::ports::{
    BookingCommand, ListHistoryRequest, ReserveRequest, ScheduleQuery, SessionAdminCommand,
};
use booking::domain::{
    BookingService, Error, ErrorCode, ExternalSession, Member, MemberId, ScheduleQueryService,
    SessionAdminService, SessionDay, SessionDraft, SessionKey, TimeSlot,
};
use booking::outbound::kv_store::InMemoryKeyValueStore;
use booking::outbound::persistence::{KvHistoryLedger, KvSessionRepository};
use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `booking-contention` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "booking-contention",
    about = "Race concurrent reservations against one capacity-limited session",
    version
)]
struct CliArgs {
    /// Seats offered by the session.
    #[arg(long, default_value_t = 5)]
    capacity: u32,
    /// Concurrent reservation attempts, one member each.
    #[arg(long, default_value_t = 50)]
    attempts: u32,
    /// Session day as an epoch-day number.
    #[arg(long, default_value_t = 19_000)]
    day: i64,
    /// Slot start, in minutes after midnight.
    #[arg(long, default_value_t = 540)]
    start: u16,
    /// Slot end, in minutes after midnight.
    #[arg(long, default_value_t = 600)]
    end: u16,
}

/// Tally of reservation outcomes.
#[derive(Debug, Default)]
struct Tally {
    accepted: u32,
    conflicts: u32,
    diverged: u32,
    failed: u32,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = BookingSettings::load_from_iter([std::ffi::OsString::from("booking")])
        .map_err(|error| io::Error::other(format!("load booking settings: {error}")))?;
    let page_size = settings
        .history_page_size()
        .map_err(|error| io::Error::other(format!("invalid history page size: {error}")))?;

    let store = Arc::new(InMemoryKeyValueStore::new());
    let sessions = Arc::new(KvSessionRepository::new(
        Arc::clone(&store),
        settings.sessions_table(),
    ));
    let history = Arc::new(KvHistoryLedger::new(store, settings.history_table()));
    let admin = SessionAdminService::new(Arc::clone(&sessions));
    let engine = Arc::new(BookingService::new(
        Arc::clone(&sessions),
        Arc::clone(&history),
    ));
    let schedule = ScheduleQueryService::new(sessions, history, Arc::new(DefaultClock))
        .with_default_page_size(page_size);

    let day = SessionDay::from_epoch_day(args.day).map_err(io::Error::other)?;
    let slot = TimeSlot::new(args.start, args.end).map_err(io::Error::other)?;
    let key = SessionKey::new(day, slot);
    admin
        .create_session(SessionDraft {
            key,
            title: "Contention run".to_owned(),
            description: "Seeded by booking-contention".to_owned(),
            coach: "bench".to_owned(),
            capacity: args.capacity,
        })
        .await
        .map_err(io::Error::other)?;

    let attempts = (0..args.attempts).map(|n| {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let member_id = MemberId::random();
            let member = Member::new(member_id.clone(), format!("Racer {n}"))
                .map_err(|error| Error::invalid_argument(error.to_string()))?;
            engine
                .reserve(ReserveRequest {
                    member,
                    session: key,
                })
                .await
                .map(|response| (member_id, response))
        })
    });

    let mut tally = Tally::default();
    let mut first_winner = None;
    for handle in attempts.collect::<Vec<_>>() {
        match handle.await.map_err(io::Error::other)? {
            Ok((member_id, response)) => {
                tally.accepted += 1;
                if response.history.is_diverged() {
                    tally.diverged += 1;
                }
                if first_winner.is_none() {
                    first_winner = Some(member_id);
                }
            }
            Err(error) if error.code() == ErrorCode::Conflict => tally.conflicts += 1,
            Err(error) => {
                warn!(%error, "reservation failed");
                tally.failed += 1;
            }
        }
    }

    let roster = schedule
        .sessions_for_day(&MemberId::random(), day)
        .await
        .map_err(io::Error::other)?;
    let booked = roster
        .iter()
        .find(|session| session.slot() == slot)
        .map_or(0, ExternalSession::participants_count);

    println!("session={key}");
    println!("capacity={}", args.capacity);
    println!("attempts={}", args.attempts);
    println!("accepted={}", tally.accepted);
    println!("conflicts={}", tally.conflicts);
    println!("failed={}", tally.failed);
    println!("history_diverged={}", tally.diverged);
    println!("participants_count={booked}");

    if let Some(member_id) = first_winner {
        let page = schedule
            .list_history(ListHistoryRequest {
                member_id,
                cursor: None,
                limit: None,
            })
            .await
            .map_err(io::Error::other)?;
        println!("first_winner_history_entries={}", page.entries.len());
    }

    Ok(())
}
