//! Driving port for administrative session maintenance.
//!
//! Callers are assumed to be authorised already.

use async_trait::async_trait;

use crate::domain::{Error, Session, SessionDraft, SessionKey, SessionPatch};

/// Driving port for creating, editing, and deleting sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAdminCommand: Send + Sync {
    /// Create a session with an empty roster.
    ///
    /// Fails with `invalid_argument` for a blank title or zero capacity and
    /// with `conflict` when the slot is already taken.
    async fn create_session(&self, draft: SessionDraft) -> Result<Session, Error>;

    /// Edit descriptive fields or capacity.
    ///
    /// The edit is validated against a freshly read snapshot; a capacity
    /// below the current participant count is rejected with
    /// `invalid_argument`.
    async fn update_session(&self, key: SessionKey, patch: SessionPatch)
    -> Result<Session, Error>;

    /// Delete a session. History entries referencing it are kept.
    async fn delete_session(&self, key: SessionKey) -> Result<(), Error>;
}
