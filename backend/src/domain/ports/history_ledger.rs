//! Port for the per-member booking history ledger.

use async_trait::async_trait;
use pagination::{Page, PageLimit};

use crate::domain::{BookingHistoryEntry, HistoryCursorKey, HistorySortKey, MemberId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by history ledger adapters.
    pub enum HistoryLedgerError {
        /// Store connection could not be established or was lost.
        Connection { message: String } =>
            "history ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "history ledger query failed: {message}",
    }
}

/// Port for appending, removing, and listing booking history entries.
///
/// Ledger writes are independent of session writes; a ledger entry may
/// briefly disagree with the roster it mirrors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryLedger: Send + Sync {
    /// Store an entry, overwriting any entry with the same key.
    async fn append(&self, entry: &BookingHistoryEntry) -> Result<(), HistoryLedgerError>;

    /// Delete an entry; succeeds when the entry is already absent.
    async fn remove(
        &self,
        member_id: &MemberId,
        sort_key: &HistorySortKey,
    ) -> Result<(), HistoryLedgerError>;

    /// Entries for one member, most recent session first, resuming strictly
    /// after `after` when given.
    async fn list_by_member(
        &self,
        member_id: &MemberId,
        after: Option<HistorySortKey>,
        limit: PageLimit,
    ) -> Result<Page<BookingHistoryEntry, HistoryCursorKey>, HistoryLedgerError>;
}

/// Fixture implementation for tests that do not exercise the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryLedger;

#[async_trait]
impl HistoryLedger for FixtureHistoryLedger {
    async fn append(&self, _entry: &BookingHistoryEntry) -> Result<(), HistoryLedgerError> {
        Ok(())
    }

    async fn remove(
        &self,
        _member_id: &MemberId,
        _sort_key: &HistorySortKey,
    ) -> Result<(), HistoryLedgerError> {
        Ok(())
    }

    async fn list_by_member(
        &self,
        _member_id: &MemberId,
        _after: Option<HistorySortKey>,
        _limit: PageLimit,
    ) -> Result<Page<BookingHistoryEntry, HistoryCursorKey>, HistoryLedgerError> {
        Ok(Page::empty())
    }
}
