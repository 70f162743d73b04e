//! Port for session persistence, including the conditional participant write.

use async_trait::async_trait;

use crate::domain::{Participants, Session, SessionDay, SessionKey, SessionPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session repository adapters.
    pub enum SessionRepositoryError {
        /// Store connection could not be established or was lost.
        Connection { message: String } =>
            "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "session repository query failed: {message}",
        /// A session already occupies the key.
        AlreadyExists { key: String } =>
            "session {key} already exists",
        /// No session occupies the key.
        NotFound { key: String } =>
            "session {key} not found",
        /// The stored roster no longer matches the expected snapshot, or no
        /// seat is left.
        PreconditionFailed { key: String } =>
            "conditional write on session {key} was rejected",
    }
}

/// Port for reading and writing sessions.
///
/// `cas_update_participants` is the only path that changes a roster. It
/// succeeds only while the stored roster still equals `previous` and, when a
/// member is being added, while the stored capacity exceeds `previous.len()`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Every session on `day`, in no particular order.
    async fn get_by_day(&self, day: SessionDay) -> Result<Vec<Session>, SessionRepositoryError>;

    /// Point lookup.
    async fn get_by_key(&self, key: SessionKey)
    -> Result<Option<Session>, SessionRepositoryError>;

    /// Insert a new session; fails with `AlreadyExists` when the key is taken.
    async fn create(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    /// Replace the roster if it still equals `previous`.
    async fn cas_update_participants(
        &self,
        key: SessionKey,
        previous: &Participants,
        next: &Participants,
    ) -> Result<(), SessionRepositoryError>;

    /// Apply an administrative edit regardless of the roster and return the
    /// stored result.
    async fn update_fields(
        &self,
        key: SessionKey,
        patch: &SessionPatch,
    ) -> Result<Session, SessionRepositoryError>;

    /// Destroy a session; fails with `NotFound` when absent.
    async fn delete(&self, key: SessionKey) -> Result<(), SessionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise session storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionRepository;

#[async_trait]
impl SessionRepository for FixtureSessionRepository {
    async fn get_by_day(&self, _day: SessionDay) -> Result<Vec<Session>, SessionRepositoryError> {
        Ok(Vec::new())
    }

    async fn get_by_key(
        &self,
        _key: SessionKey,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _session: &Session) -> Result<(), SessionRepositoryError> {
        Ok(())
    }

    async fn cas_update_participants(
        &self,
        _key: SessionKey,
        _previous: &Participants,
        _next: &Participants,
    ) -> Result<(), SessionRepositoryError> {
        Ok(())
    }

    async fn update_fields(
        &self,
        key: SessionKey,
        _patch: &SessionPatch,
    ) -> Result<Session, SessionRepositoryError> {
        Err(SessionRepositoryError::not_found(key.to_string()))
    }

    async fn delete(&self, _key: SessionKey) -> Result<(), SessionRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::TimeSlot;

    fn key() -> SessionKey {
        SessionKey::new(
            SessionDay::from_epoch_day(19_000).expect("valid day"),
            TimeSlot::new(540, 600).expect("valid slot"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_find_nothing() {
        let repo = FixtureSessionRepository;
        assert!(repo.get_by_key(key()).await.expect("lookup").is_none());
        assert!(repo.get_by_day(key().day).await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_edits_report_missing_sessions() {
        let repo = FixtureSessionRepository;
        let err = repo
            .update_fields(key(), &SessionPatch::default())
            .await
            .expect_err("fixture has no sessions");
        assert_eq!(err, SessionRepositoryError::not_found("2022-01-08@0540#0600"));
    }

    #[rstest]
    fn precondition_error_names_the_session() {
        let err = SessionRepositoryError::precondition_failed(key().to_string());
        assert!(err.to_string().contains("2022-01-08@0540#0600"));
    }
}
