//! Booking engine: reservations and cancellations.
//!
//! Each call reads a fresh session snapshot, validates the request against it
//! in memory, and makes one conditional roster write. A rejected write is
//! reported as a conflict and never retried here; callers that want to retry
//! must start again from a fresh read. After a committed roster change the
//! history ledger is updated as a separate, non-atomic step.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::booking_service_support::{
    CAS_CONFLICT_MESSAGE, history_sync, map_session_repository_error,
};
use crate::domain::ports::{
    BookingCommand, CancelRequest, CancelResponse, HistoryLedger, ReserveRequest,
    ReserveResponse, SessionRepository,
};
use crate::domain::{BookingHistoryEntry, Error, HistorySortKey, Session, SessionKey};

/// Booking service implementing [`BookingCommand`].
///
/// # Examples
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use booking::domain::BookingService;
/// # use booking::domain::ports::{FixtureHistoryLedger, FixtureSessionRepository};
/// let service = BookingService::new(
///     Arc::new(FixtureSessionRepository),
///     Arc::new(FixtureHistoryLedger),
/// );
/// # let _ = service;
/// ```
#[derive(Clone)]
pub struct BookingService<R, H> {
    sessions: Arc<R>,
    history: Arc<H>,
}

impl<R, H> BookingService<R, H> {
    /// Create a booking service over a session repository and history ledger.
    pub fn new(sessions: Arc<R>, history: Arc<H>) -> Self {
        Self { sessions, history }
    }
}

impl<R, H> BookingService<R, H>
where
    R: SessionRepository,
    H: HistoryLedger,
{
    async fn snapshot(&self, key: SessionKey) -> Result<Session, Error> {
        self.sessions
            .get_by_key(key)
            .await
            .map_err(map_session_repository_error)?
            .ok_or_else(|| Error::not_found(format!("session {key} not found")))
    }
}

#[async_trait]
impl<R, H> BookingCommand for BookingService<R, H>
where
    R: SessionRepository,
    H: HistoryLedger,
{
    async fn reserve(&self, request: ReserveRequest) -> Result<ReserveResponse, Error> {
        let ReserveRequest {
            member,
            session: key,
        } = request;
        let member_id = member.id().clone();
        let snapshot = self.snapshot(key).await?;

        if snapshot.is_booked(&member_id) {
            return Err(Error::conflict(format!(
                "member {member_id} already booked session {key}"
            )));
        }
        if !snapshot.has_free_seat() {
            warn!(%member_id, session = %key, "reservation rejected: session full");
            return Err(Error::conflict(CAS_CONFLICT_MESSAGE));
        }

        let next = snapshot
            .participants()
            .with_member(member)
            .map_err(|_| Error::conflict(CAS_CONFLICT_MESSAGE))?;
        self.sessions
            .cas_update_participants(key, snapshot.participants(), &next)
            .await
            .map_err(|error| {
                warn!(%member_id, session = %key, %error, "reservation write rejected");
                map_session_repository_error(error)
            })?;

        let committed = snapshot
            .with_participants(next)
            .map_err(|err| Error::internal(format!("committed roster is invalid: {err}")))?;
        info!(
            %member_id,
            session = %key,
            participants = committed.participants().len(),
            capacity = committed.capacity(),
            "reservation committed"
        );

        let view = committed.to_external_view(&member_id);
        let entry = BookingHistoryEntry::new(member_id.clone(), view.clone());
        let history = history_sync(
            self.history.append(&entry).await,
            "reserve",
            &member_id,
            key,
        );

        Ok(ReserveResponse {
            session: view,
            history,
        })
    }

    async fn cancel(&self, request: CancelRequest) -> Result<CancelResponse, Error> {
        let CancelRequest {
            member_id,
            session: key,
        } = request;
        let snapshot = self.snapshot(key).await?;

        if !snapshot.is_booked(&member_id) {
            return Err(Error::not_found(format!(
                "member {member_id} has not booked session {key}"
            )));
        }

        let next = snapshot.participants().without_member(&member_id);
        self.sessions
            .cas_update_participants(key, snapshot.participants(), &next)
            .await
            .map_err(|error| {
                warn!(%member_id, session = %key, %error, "cancellation write rejected");
                map_session_repository_error(error)
            })?;
        info!(
            %member_id,
            session = %key,
            participants = next.len(),
            "cancellation committed"
        );

        let history = history_sync(
            self.history
                .remove(&member_id, &HistorySortKey::from(key))
                .await,
            "cancel",
            &member_id,
            key,
        );

        Ok(CancelResponse { history })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
