//! Booking history ledger entries and their pagination key.
//!
//! Each member owns one ledger partition. Entries are keyed by a sort key
//! derived from the session's day and slot; zero padding makes lexical order
//! match chronological order, so a descending range read yields the most
//! recent sessions first.

use std::fmt;

use pagination::CursorKey;
use serde::{Deserialize, Serialize};

use crate::domain::{ExternalSession, MemberId, SessionDay, SessionKey, TimeSlot};

/// Error raised when a history sort key string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed history sort key {key:?}")]
pub struct HistorySortKeyError {
    key: String,
}

/// Sort key of a ledger entry: `"{day:06}#{start:04}#{end:04}"`.
///
/// # Examples
/// ```
/// use booking::domain::{HistorySortKey, SessionDay, SessionKey, TimeSlot};
///
/// let key = SessionKey::new(SessionDay::from_epoch_day(19_000)?, TimeSlot::new(540, 600)?);
/// assert_eq!(HistorySortKey::from(key).as_str(), "019000#0540#0600");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HistorySortKey(String);

impl HistorySortKey {
    /// Parse and validate a sort key string.
    ///
    /// # Errors
    ///
    /// Returns [`HistorySortKeyError`] unless the string names a valid day
    /// and slot in canonical form.
    pub fn parse(raw: &str) -> Result<Self, HistorySortKeyError> {
        Self::session_key(raw)
            .map(Self::from)
            .ok_or_else(|| HistorySortKeyError {
                key: raw.to_owned(),
            })
    }

    fn session_key(raw: &str) -> Option<SessionKey> {
        let (day, slot) = raw.split_once('#')?;
        if day.len() != 6 || !day.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let day = SessionDay::from_epoch_day(day.parse().ok()?).ok()?;
        let slot = TimeSlot::parse_key(slot).ok()?;
        Some(SessionKey::new(day, slot))
    }

    /// Borrow the key text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SessionKey> for HistorySortKey {
    fn from(value: SessionKey) -> Self {
        Self(format!("{:06}#{}", value.day.epoch_day(), value.slot))
    }
}

impl fmt::Display for HistorySortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<HistorySortKey> for String {
    fn from(value: HistorySortKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for HistorySortKey {
    type Error = HistorySortKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// One member's record of one booked session.
///
/// The session projection is frozen at booking time. Entries are removed on
/// cancellation and never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryEntry {
    member_id: MemberId,
    sort_key: HistorySortKey,
    session: ExternalSession,
}

impl BookingHistoryEntry {
    /// Build an entry for `member_id` from the projection returned to them.
    pub fn new(member_id: MemberId, session: ExternalSession) -> Self {
        let sort_key = HistorySortKey::from(SessionKey::new(session.day(), session.slot()));
        Self {
            member_id,
            sort_key,
            session,
        }
    }

    /// Owning member.
    pub const fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Position within the member's ledger.
    pub const fn sort_key(&self) -> &HistorySortKey {
        &self.sort_key
    }

    /// Session snapshot taken at booking time.
    pub const fn session(&self) -> &ExternalSession {
        &self.session
    }

    /// Pagination key pointing at this entry.
    pub fn cursor_key(&self) -> HistoryCursorKey {
        HistoryCursorKey {
            member_id: self.member_id.clone(),
            sort_key: self.sort_key.clone(),
        }
    }
}

/// Last ledger key seen by a history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryCursorKey {
    /// Ledger partition.
    pub member_id: MemberId,
    /// Entry position within the partition.
    pub sort_key: HistorySortKey,
}

impl CursorKey for HistoryCursorKey {
    const SHAPE: &'static str = "booking-history";
}
