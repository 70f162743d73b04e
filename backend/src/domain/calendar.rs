//! Calendar days that key sessions.
//!
//! Days are UTC dates stored and exchanged as epoch-day integers (days since
//! 1970-01-01). Weeks follow ISO numbering and start on Monday.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Largest epoch day accepted; keeps the zero-padded history sort key at six
/// digits.
pub const MAX_EPOCH_DAY: i64 = 999_999;

/// Errors raised while constructing a [`SessionDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The day lies before the Unix epoch.
    #[error("day {day} precedes 1970-01-01")]
    BeforeEpoch {
        /// Offending epoch day.
        day: i64,
    },
    /// The day lies beyond [`MAX_EPOCH_DAY`].
    #[error("day {day} is out of range")]
    OutOfRange {
        /// Offending epoch day.
        day: i64,
    },
    /// The timestamp cannot be represented as a date.
    #[error("timestamp {millis}ms is not a representable date")]
    InvalidTimestamp {
        /// Offending timestamp in milliseconds.
        millis: i64,
    },
}

/// One UTC calendar day, truncated to midnight.
///
/// # Examples
/// ```
/// use booking::domain::SessionDay;
///
/// let day = SessionDay::from_epoch_day(19_000)?;
/// assert_eq!(day.to_string(), "2022-01-08");
/// assert_eq!(day.epoch_day(), 19_000);
/// # Ok::<(), booking::domain::CalendarError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SessionDay(NaiveDate);

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

impl SessionDay {
    /// Build a day from its epoch-day number.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] for days before the epoch or beyond
    /// [`MAX_EPOCH_DAY`].
    pub fn from_epoch_day(day: i64) -> Result<Self, CalendarError> {
        let offset = u64::try_from(day).map_err(|_| CalendarError::BeforeEpoch { day })?;
        if day > MAX_EPOCH_DAY {
            return Err(CalendarError::OutOfRange { day });
        }
        epoch()
            .checked_add_days(Days::new(offset))
            .map(Self)
            .ok_or(CalendarError::OutOfRange { day })
    }

    /// Truncate an epoch-millisecond timestamp to its UTC day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when the timestamp is not representable or
    /// falls outside the accepted range.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, CalendarError> {
        let timestamp = DateTime::from_timestamp_millis(millis)
            .ok_or(CalendarError::InvalidTimestamp { millis })?;
        Self::from_date(timestamp.date_naive())
    }

    /// Wrap a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when the date falls outside the accepted
    /// range.
    pub fn from_date(date: NaiveDate) -> Result<Self, CalendarError> {
        let day = date.signed_duration_since(epoch()).num_days();
        if day < 0 {
            return Err(CalendarError::BeforeEpoch { day });
        }
        if day > MAX_EPOCH_DAY {
            return Err(CalendarError::OutOfRange { day });
        }
        Ok(Self(date))
    }

    /// Days since 1970-01-01.
    pub fn epoch_day(self) -> i64 {
        self.0.signed_duration_since(epoch()).num_days()
    }

    /// Calendar date.
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The seven days, Monday first, of the ISO week containing this day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when part of the week falls outside the
    /// accepted range (the first and last weeks of the range).
    pub fn week(self) -> Result<[Self; 7], CalendarError> {
        let monday_offset = u64::from(self.0.weekday().num_days_from_monday());
        let monday = self
            .0
            .checked_sub_days(Days::new(monday_offset))
            .ok_or(CalendarError::BeforeEpoch {
                day: self.epoch_day(),
            })?;
        let first = Self::from_date(monday)?.epoch_day();
        let mut days = [self; 7];
        for (offset, slot) in (0_i64..).zip(days.iter_mut()) {
            *slot = Self::from_epoch_day(first + offset)?;
        }
        Ok(days)
    }
}

impl fmt::Display for SessionDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<SessionDay> for i64 {
    fn from(value: SessionDay) -> Self {
        value.epoch_day()
    }
}

impl TryFrom<i64> for SessionDay {
    type Error = CalendarError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_epoch_day(value)
    }
}
