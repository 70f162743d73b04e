//! Administrative session maintenance.
//!
//! Edits go through the repository's unconditioned field update. Capacity
//! changes are validated against a fresh snapshot first, so a concurrent
//! reservation landing between the check and the write can leave the roster
//! one seat over the new capacity. Such a session stays readable and
//! its members can still cancel; new reservations are refused until
//! the roster drains under the capacity.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking_service_support::map_session_repository_error;
use crate::domain::ports::{SessionAdminCommand, SessionRepository};
use crate::domain::{Error, Session, SessionDraft, SessionKey, SessionPatch};

/// Admin service implementing [`SessionAdminCommand`].
#[derive(Clone)]
pub struct SessionAdminService<R> {
    sessions: Arc<R>,
}

impl<R> SessionAdminService<R> {
    /// Create an admin service over a session repository.
    pub fn new(sessions: Arc<R>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<R> SessionAdminCommand for SessionAdminService<R>
where
    R: SessionRepository,
{
    async fn create_session(&self, draft: SessionDraft) -> Result<Session, Error> {
        let session = Session::new(draft)
            .map_err(|err| Error::invalid_argument(format!("invalid session: {err}")))?;
        self.sessions
            .create(&session)
            .await
            .map_err(map_session_repository_error)?;
        info!(session = %session.key(), capacity = session.capacity(), "session created");
        Ok(session)
    }

    async fn update_session(
        &self,
        key: SessionKey,
        patch: SessionPatch,
    ) -> Result<Session, Error> {
        let snapshot = self
            .sessions
            .get_by_key(key)
            .await
            .map_err(map_session_repository_error)?
            .ok_or_else(|| Error::not_found(format!("session {key} not found")))?;
        snapshot
            .apply_patch(&patch)
            .map_err(|err| Error::invalid_argument(format!("invalid session edit: {err}")))?;

        let updated = self
            .sessions
            .update_fields(key, &patch)
            .await
            .map_err(map_session_repository_error)?;
        info!(session = %key, capacity = updated.capacity(), "session updated");
        Ok(updated)
    }

    async fn delete_session(&self, key: SessionKey) -> Result<(), Error> {
        self.sessions
            .delete(key)
            .await
            .map_err(map_session_repository_error)?;
        info!(session = %key, "session deleted");
        Ok(())
    }
}
