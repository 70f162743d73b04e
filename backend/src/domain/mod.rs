//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: model capacity-limited sessions, the reservations members hold
//! on them, and the per-member booking history. Types are immutable values;
//! each documents its invariants and serialisation contract in its Rustdoc.
//!
//! Public surface:
//! - `SessionDay`, `TimeSlot`, `SessionKey`: session identity.
//! - `Session`, `Participants`, `ExternalSession`: the aggregate, its roster,
//!   and the member-facing projection.
//! - `BookingHistoryEntry`, `HistorySortKey`, `HistoryCursorKey`: the ledger.
//! - `BookingService`, `ScheduleQueryService`, `SessionAdminService`: driving
//!   port implementations.
//! - `Error` and `ErrorCode`: transport-agnostic failures.

pub mod calendar;
pub mod error;
pub mod history;
pub mod member;
pub mod ports;
pub mod session;

mod booking_service;
mod booking_service_support;
mod schedule_service;
mod session_admin_service;

pub use self::booking_service::BookingService;
pub use self::calendar::{CalendarError, MAX_EPOCH_DAY, SessionDay};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::history::{
    BookingHistoryEntry, HistoryCursorKey, HistorySortKey, HistorySortKeyError,
};
pub use self::member::{Member, MemberId, MemberValidationError};
pub use self::schedule_service::ScheduleQueryService;
pub use self::session::{
    ExternalSession, MINUTES_PER_DAY, Participants, Session, SessionDraft, SessionKey,
    SessionPatch, SessionValidationError, TimeSlot,
};
pub use self::session_admin_service::SessionAdminService;

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use booking::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("no such session"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
