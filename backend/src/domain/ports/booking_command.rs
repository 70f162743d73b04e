//! Driving port for reservations and cancellations.
//!
//! Both operations run a single read, check, conditional-write attempt
//! against the session and then mirror the outcome into the history ledger.
//! The ledger write is not atomic with the session write; its result is
//! reported separately through [`HistorySync`].

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, ExternalSession, Member, MemberId, SessionKey};

/// Request to reserve a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveRequest {
    /// Snapshot stored on the roster.
    pub member: Member,
    /// Session to join.
    pub session: SessionKey,
}

/// Request to release a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    /// Member giving up the seat.
    pub member_id: MemberId,
    /// Session to leave.
    pub session: SessionKey,
}

/// Outcome of the ledger write that follows a committed roster change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HistorySync {
    /// The ledger mirrors the roster change.
    Recorded,
    /// The roster change committed but the ledger write failed.
    Diverged {
        /// Ledger failure description.
        reason: String,
    },
}

impl HistorySync {
    /// Whether the ledger write failed.
    pub const fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }
}

/// Successful reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveResponse {
    /// Session as now seen by the member.
    pub session: ExternalSession,
    /// Ledger outcome.
    pub history: HistorySync,
}

/// Successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    /// Ledger outcome.
    pub history: HistorySync,
}

/// Driving port for booking mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve a seat for `request.member`.
    ///
    /// Fails with `not_found` when the session is absent and with `conflict`
    /// when the member already holds a seat, the session is full, or the
    /// roster changed since it was read. Never retries.
    async fn reserve(&self, request: ReserveRequest) -> Result<ReserveResponse, Error>;

    /// Release the seat held by `request.member_id`.
    ///
    /// Fails with `not_found` when the session is absent or the member holds
    /// no seat, and with `conflict` when the roster changed since it was read.
    async fn cancel(&self, request: CancelRequest) -> Result<CancelResponse, Error>;
}
