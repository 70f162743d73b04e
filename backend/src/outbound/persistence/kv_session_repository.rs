//! Key-value store backed `SessionRepository`.
//!
//! Sessions are partitioned by day and sorted by slot key. The roster write
//! is a single conditional update: it requires the stored `participants`
//! attribute to equal the caller's snapshot and, when a seat is being taken,
//! the stored `capacity` to exceed the snapshot's size.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::{SessionRepository, SessionRepositoryError};
use crate::domain::{Participants, Session, SessionDay, SessionKey, SessionPatch};
use crate::outbound::kv_store::{Condition, Item, KeyValueStore, QueryRequest, StoreError};

use super::records::{
    CAPACITY_ATTR, PARTICIPANTS_ATTR, RecordError, SessionRecord, day_partition, from_item,
    patch_values, patched, session_item_key, to_item,
};

/// Session repository over any [`KeyValueStore`].
pub struct KvSessionRepository<S> {
    store: Arc<S>,
    table: String,
}

impl<S> KvSessionRepository<S> {
    /// Create a repository writing to `table`.
    pub fn new(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }
}

impl<S> Clone for KvSessionRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table.clone(),
        }
    }
}

/// Map store failures that carry no write-specific meaning.
fn map_store_error(error: StoreError, key: SessionKey) -> SessionRepositoryError {
    debug!(%error, session = %key, "session store operation failed");
    match error {
        StoreError::Unavailable { message } => SessionRepositoryError::connection(message),
        StoreError::InvalidRequest { message } => SessionRepositoryError::query(message),
        StoreError::ConditionFailed => SessionRepositoryError::precondition_failed(key.to_string()),
    }
}

fn map_record_error(error: RecordError) -> SessionRepositoryError {
    SessionRepositoryError::query(error.to_string())
}

fn decode(item: Item) -> Result<Session, SessionRepositoryError> {
    let record: SessionRecord = from_item(item).map_err(map_record_error)?;
    Session::try_from(record).map_err(map_record_error)
}

fn roster_value(participants: &Participants) -> Result<Value, SessionRepositoryError> {
    serde_json::to_value(participants)
        .map_err(|err| SessionRepositoryError::query(format!("failed to encode roster: {err}")))
}

#[async_trait]
impl<S> SessionRepository for KvSessionRepository<S>
where
    S: KeyValueStore,
{
    async fn get_by_day(&self, day: SessionDay) -> Result<Vec<Session>, SessionRepositoryError> {
        let partition = day_partition(day);
        let mut sessions = Vec::new();
        let mut start = None;
        loop {
            let output = self
                .store
                .query(&self.table, QueryRequest::new(partition.clone()).after(start))
                .await
                .map_err(|error| {
                    debug!(%error, %day, "session day query failed");
                    match error {
                        StoreError::Unavailable { message } => {
                            SessionRepositoryError::connection(message)
                        }
                        other => SessionRepositoryError::query(other.to_string()),
                    }
                })?;
            for item in output.items {
                sessions.push(decode(item)?);
            }
            match output.last_evaluated {
                Some(last) => start = Some(last),
                None => return Ok(sessions),
            }
        }
    }

    async fn get_by_key(
        &self,
        key: SessionKey,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        let item = self
            .store
            .get(&self.table, &session_item_key(key))
            .await
            .map_err(|error| map_store_error(error, key))?;
        item.map(decode).transpose()
    }

    async fn create(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let key = session.key();
        let item = to_item(&SessionRecord::from(session)).map_err(map_record_error)?;
        self.store
            .put(
                &self.table,
                &session_item_key(key),
                item,
                Some(Condition::ItemAbsent),
            )
            .await
            .map_err(|error| match error {
                StoreError::ConditionFailed => {
                    SessionRepositoryError::already_exists(key.to_string())
                }
                other => map_store_error(other, key),
            })
    }

    async fn cas_update_participants(
        &self,
        key: SessionKey,
        previous: &Participants,
        next: &Participants,
    ) -> Result<(), SessionRepositoryError> {
        let mut conditions = vec![Condition::AttributeEquals {
            name: PARTICIPANTS_ATTR.to_owned(),
            value: roster_value(previous)?,
        }];
        if next.len() > previous.len() {
            conditions.push(Condition::AttributeGreaterThan {
                name: CAPACITY_ATTR.to_owned(),
                value: i64::from(previous.len()),
            });
        }
        let mut values = Item::new();
        values.insert(PARTICIPANTS_ATTR.to_owned(), roster_value(next)?);

        self.store
            .update(
                &self.table,
                &session_item_key(key),
                Some(Condition::All(conditions)),
                values,
            )
            .await
            .map_err(|error| map_store_error(error, key))?;
        debug!(session = %key, participants = next.len(), "roster updated");
        Ok(())
    }

    async fn update_fields(
        &self,
        key: SessionKey,
        patch: &SessionPatch,
    ) -> Result<Session, SessionRepositoryError> {
        let current = self
            .get_by_key(key)
            .await?
            .ok_or_else(|| SessionRepositoryError::not_found(key.to_string()))?;
        let item = self
            .store
            .update(
                &self.table,
                &session_item_key(key),
                Some(Condition::ItemExists),
                patch_values(patch),
            )
            .await
            .map_err(|error| match error {
                StoreError::ConditionFailed => SessionRepositoryError::not_found(key.to_string()),
                other => map_store_error(other, key),
            })?;
        // The edit is durable from here on; a failed read-back must not
        // report it as rejected.
        Ok(decode(item).unwrap_or_else(|error| {
            warn!(%error, session = %key, "edited session could not be read back");
            patched(&current, patch)
        }))
    }

    async fn delete(&self, key: SessionKey) -> Result<(), SessionRepositoryError> {
        self.store
            .delete(&self.table, &session_item_key(key), Some(Condition::ItemExists))
            .await
            .map_err(|error| match error {
                StoreError::ConditionFailed => SessionRepositoryError::not_found(key.to_string()),
                other => map_store_error(other, key),
            })
    }
}
