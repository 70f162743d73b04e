//! Error mapping shared by the booking, schedule, and admin services.

use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{HistoryLedgerError, HistorySync, SessionRepositoryError};
use crate::domain::{MemberId, SessionKey};

/// Message returned when a conditional roster write is rejected.
pub(crate) const CAS_CONFLICT_MESSAGE: &str = "capacity full or concurrent modification";

pub(crate) fn map_session_repository_error(error: SessionRepositoryError) -> Error {
    match error {
        SessionRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("session repository unavailable: {message}"))
        }
        SessionRepositoryError::Query { message } => {
            Error::internal(format!("session repository error: {message}"))
        }
        SessionRepositoryError::AlreadyExists { key } => {
            Error::conflict(format!("session {key} already exists"))
        }
        SessionRepositoryError::NotFound { key } => {
            Error::not_found(format!("session {key} not found"))
        }
        SessionRepositoryError::PreconditionFailed { .. } => Error::conflict(CAS_CONFLICT_MESSAGE),
    }
}

pub(crate) fn map_history_ledger_error(error: HistoryLedgerError) -> Error {
    match error {
        HistoryLedgerError::Connection { message } => {
            Error::store_unavailable(format!("history ledger unavailable: {message}"))
        }
        HistoryLedgerError::Query { message } => {
            Error::internal(format!("history ledger error: {message}"))
        }
    }
}

/// Convert the ledger write that follows a committed roster change into a
/// [`HistorySync`], logging divergence.
pub(crate) fn history_sync(
    result: Result<(), HistoryLedgerError>,
    action: &'static str,
    member_id: &MemberId,
    key: SessionKey,
) -> HistorySync {
    match result {
        Ok(()) => HistorySync::Recorded,
        Err(error) => {
            warn!(
                %member_id,
                session = %key,
                action,
                %error,
                "roster change committed but history ledger write failed"
            );
            HistorySync::Diverged {
                reason: error.to_string(),
            }
        }
    }
}
