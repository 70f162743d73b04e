//! Driving port for schedule listings and booking history browsing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{BookingHistoryEntry, Error, ExternalSession, MemberId, SessionDay};

/// Sessions for each day of one ISO week, Monday first.
///
/// All seven days are present; days without sessions map to an empty list.
pub type WeekSchedule = BTreeMap<SessionDay, Vec<ExternalSession>>;

/// Request for one page of a member's booking history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHistoryRequest {
    /// Ledger owner.
    pub member_id: MemberId,
    /// Opaque token from a previous page.
    pub cursor: Option<String>,
    /// Page size; the configured default applies when absent.
    pub limit: Option<u32>,
}

/// One page of booking history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryResponse {
    /// Entries, most recent session first.
    pub entries: Vec<BookingHistoryEntry>,
    /// Token for the next page; absent once the ledger is exhausted.
    pub cursor: Option<String>,
}

/// Driving port for read-only schedule views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    /// Sessions on `day` as seen by `member_id`, ordered by slot.
    async fn sessions_for_day(
        &self,
        member_id: &MemberId,
        day: SessionDay,
    ) -> Result<Vec<ExternalSession>, Error>;

    /// Sessions for the ISO week containing `day`.
    async fn sessions_for_week(
        &self,
        member_id: &MemberId,
        day: SessionDay,
    ) -> Result<WeekSchedule, Error>;

    /// Sessions for the current UTC week.
    async fn sessions_this_week(&self, member_id: &MemberId) -> Result<WeekSchedule, Error>;

    /// One page of the member's booking history.
    ///
    /// Fails with `invalid_cursor` for tokens that do not decode or were
    /// issued to another member, and with `invalid_argument` for page sizes
    /// outside `1..=100`.
    async fn list_history(&self, request: ListHistoryRequest)
    -> Result<ListHistoryResponse, Error>;
}
