//! Read-side services: day and week schedules and booking history pages.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use pagination::{Cursor, PageLimit};

use crate::domain::booking_service_support::{
    map_history_ledger_error, map_session_repository_error,
};
use crate::domain::ports::{
    HistoryLedger, ListHistoryRequest, ListHistoryResponse, ScheduleQuery, SessionRepository,
    WeekSchedule,
};
use crate::domain::{
    Error, ExternalSession, HistoryCursorKey, HistorySortKey, MemberId, Session, SessionDay,
};

/// Schedule service implementing [`ScheduleQuery`].
#[derive(Clone)]
pub struct ScheduleQueryService<R, H> {
    sessions: Arc<R>,
    history: Arc<H>,
    clock: Arc<dyn Clock>,
    default_page_size: PageLimit,
}

impl<R, H> ScheduleQueryService<R, H> {
    /// Create a query service.
    ///
    /// History pages default to [`PageLimit::DEFAULT`] entries; see
    /// [`Self::with_default_page_size`].
    pub fn new(sessions: Arc<R>, history: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions,
            history,
            clock,
            default_page_size: PageLimit::DEFAULT,
        }
    }

    /// Override the page size used when a request does not name one.
    #[must_use]
    pub fn with_default_page_size(mut self, page_size: PageLimit) -> Self {
        self.default_page_size = page_size;
        self
    }
}

fn decode_history_cursor(
    token: Option<&str>,
    member_id: &MemberId,
) -> Result<Option<HistorySortKey>, Error> {
    let Some(token) = token else {
        return Ok(None);
    };
    let key = Cursor::<HistoryCursorKey>::decode(token)
        .map_err(|err| Error::invalid_cursor(format!("invalid history cursor: {err}")))?
        .into_key();
    if &key.member_id != member_id {
        return Err(Error::invalid_cursor(
            "history cursor was issued for another member",
        ));
    }
    Ok(Some(key.sort_key))
}

#[async_trait]
impl<R, H> ScheduleQuery for ScheduleQueryService<R, H>
where
    R: SessionRepository,
    H: HistoryLedger,
{
    async fn sessions_for_day(
        &self,
        member_id: &MemberId,
        day: SessionDay,
    ) -> Result<Vec<ExternalSession>, Error> {
        let mut sessions = self
            .sessions
            .get_by_day(day)
            .await
            .map_err(map_session_repository_error)?;
        sessions.sort_by_key(Session::slot);
        Ok(sessions
            .iter()
            .map(|session| session.to_external_view(member_id))
            .collect())
    }

    async fn sessions_for_week(
        &self,
        member_id: &MemberId,
        day: SessionDay,
    ) -> Result<WeekSchedule, Error> {
        let week = day.week().map_err(|err| {
            Error::invalid_argument(format!("week of {day} is out of range: {err}"))
        })?;
        let days =
            try_join_all(week.iter().map(|d| self.sessions_for_day(member_id, *d))).await?;
        Ok(week.into_iter().zip(days).collect())
    }

    async fn sessions_this_week(&self, member_id: &MemberId) -> Result<WeekSchedule, Error> {
        let today = SessionDay::from_date(self.clock.utc().date_naive())
            .map_err(|err| Error::internal(format!("clock is out of range: {err}")))?;
        self.sessions_for_week(member_id, today).await
    }

    async fn list_history(
        &self,
        request: ListHistoryRequest,
    ) -> Result<ListHistoryResponse, Error> {
        let ListHistoryRequest {
            member_id,
            cursor,
            limit,
        } = request;
        let limit = PageLimit::resolve(limit, self.default_page_size)
            .map_err(|err| Error::invalid_argument(err.to_string()))?;
        let after = decode_history_cursor(cursor.as_deref(), &member_id)?;

        let page = self
            .history
            .list_by_member(&member_id, after, limit)
            .await
            .map_err(map_history_ledger_error)?;
        let cursor = page
            .next_token()
            .map_err(|err| Error::internal(format!("failed to encode history cursor: {err}")))?;

        Ok(ListHistoryResponse {
            entries: page.items,
            cursor,
        })
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
