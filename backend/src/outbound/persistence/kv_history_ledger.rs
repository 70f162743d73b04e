//! Key-value store backed `HistoryLedger`.
//!
//! Each member owns one partition; entries sort by their history sort key
//! and are listed in descending order so the most recent session comes
//! first.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageLimit};
use tracing::debug;

use crate::domain::ports::{HistoryLedger, HistoryLedgerError};
use crate::domain::{BookingHistoryEntry, HistoryCursorKey, HistorySortKey, MemberId};
use crate::outbound::kv_store::{KeyValueStore, QueryRequest, StoreError};

use super::records::{HistoryRecord, RecordError, from_item, history_item_key, to_item};

/// History ledger over any [`KeyValueStore`].
pub struct KvHistoryLedger<S> {
    store: Arc<S>,
    table: String,
}

impl<S> KvHistoryLedger<S> {
    /// Create a ledger writing to `table`.
    pub fn new(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }
}

impl<S> Clone for KvHistoryLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table.clone(),
        }
    }
}

fn map_store_error(error: StoreError) -> HistoryLedgerError {
    debug!(%error, "history store operation failed");
    match error {
        StoreError::Unavailable { message } => HistoryLedgerError::connection(message),
        other => HistoryLedgerError::query(other.to_string()),
    }
}

fn map_record_error(error: RecordError) -> HistoryLedgerError {
    HistoryLedgerError::query(error.to_string())
}

#[async_trait]
impl<S> HistoryLedger for KvHistoryLedger<S>
where
    S: KeyValueStore,
{
    async fn append(&self, entry: &BookingHistoryEntry) -> Result<(), HistoryLedgerError> {
        let item = to_item(&HistoryRecord::from(entry)).map_err(map_record_error)?;
        self.store
            .put(
                &self.table,
                &history_item_key(entry.member_id(), entry.sort_key()),
                item,
                None,
            )
            .await
            .map_err(map_store_error)
    }

    async fn remove(
        &self,
        member_id: &MemberId,
        sort_key: &HistorySortKey,
    ) -> Result<(), HistoryLedgerError> {
        self.store
            .delete(&self.table, &history_item_key(member_id, sort_key), None)
            .await
            .map_err(map_store_error)
    }

    async fn list_by_member(
        &self,
        member_id: &MemberId,
        after: Option<HistorySortKey>,
        limit: PageLimit,
    ) -> Result<Page<BookingHistoryEntry, HistoryCursorKey>, HistoryLedgerError> {
        let request = QueryRequest::new(member_id.to_string())
            .descending()
            .limit(limit.as_usize())
            .after(after.map(|sort_key| history_item_key(member_id, &sort_key)));
        let output = self
            .store
            .query(&self.table, request)
            .await
            .map_err(map_store_error)?;

        let entries = output
            .items
            .into_iter()
            .map(|item| {
                from_item::<HistoryRecord>(item)
                    .and_then(BookingHistoryEntry::try_from)
                    .map_err(map_record_error)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let next = output
            .last_evaluated
            .map(|key| {
                HistorySortKey::parse(&key.sort)
                    .map(|sort_key| HistoryCursorKey {
                        member_id: member_id.clone(),
                        sort_key,
                    })
                    .map_err(|err| HistoryLedgerError::query(err.to_string()))
            })
            .transpose()?;
        debug!(%member_id, entries = entries.len(), more = next.is_some(), "history page read");

        Ok(Page::new(entries, next))
    }
}
