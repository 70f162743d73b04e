//! Time slots and composite session keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SessionValidationError;
use crate::domain::SessionDay;

/// Minutes in one day; the exclusive upper bound of a slot start and the
/// inclusive upper bound of a slot end.
pub const MINUTES_PER_DAY: u16 = 1440;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSlotFields {
    start_minute: u16,
    end_minute: u16,
}

/// Minutes-of-day range occupied by a session.
///
/// The canonical key is `"{start:04}#{end:04}"`, so keys sort in start order.
///
/// # Examples
/// ```
/// use booking::domain::TimeSlot;
///
/// let slot = TimeSlot::new(540, 600)?;
/// assert_eq!(slot.key(), "0540#0600");
/// assert_eq!(TimeSlot::parse_key("0540#0600")?, slot);
/// # Ok::<(), booking::domain::SessionValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeSlotFields", into = "TimeSlotFields")]
pub struct TimeSlot {
    start_minute: u16,
    end_minute: u16,
}

impl TimeSlot {
    /// Validate and build a slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::InvalidSlot`] unless
    /// `start < end <= 1440`.
    pub const fn new(start_minute: u16, end_minute: u16) -> Result<Self, SessionValidationError> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(SessionValidationError::InvalidSlot {
                start_minute,
                end_minute,
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    /// Parse a canonical slot key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::MalformedSlotKey`] when the string
    /// is not two four-digit numbers joined by `#`, or
    /// [`SessionValidationError::InvalidSlot`] when the bounds are invalid.
    pub fn parse_key(key: &str) -> Result<Self, SessionValidationError> {
        let malformed = || SessionValidationError::MalformedSlotKey {
            key: key.to_owned(),
        };
        let (start, end) = key.split_once('#').ok_or_else(malformed)?;
        Self::new(
            parse_minute(start).ok_or_else(malformed)?,
            parse_minute(end).ok_or_else(malformed)?,
        )
    }

    /// Start minute of the day.
    pub const fn start_minute(self) -> u16 {
        self.start_minute
    }

    /// End minute of the day.
    pub const fn end_minute(self) -> u16 {
        self.end_minute
    }

    /// Canonical slot key.
    pub fn key(self) -> String {
        self.to_string()
    }
}

fn parse_minute(raw: &str) -> Option<u16> {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}#{:04}", self.start_minute, self.end_minute)
    }
}

impl From<TimeSlot> for TimeSlotFields {
    fn from(value: TimeSlot) -> Self {
        Self {
            start_minute: value.start_minute,
            end_minute: value.end_minute,
        }
    }
}

impl TryFrom<TimeSlotFields> for TimeSlot {
    type Error = SessionValidationError;

    fn try_from(value: TimeSlotFields) -> Result<Self, Self::Error> {
        Self::new(value.start_minute, value.end_minute)
    }
}

/// Natural identity of a session; never reassigned after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey {
    /// Day the session runs on.
    pub day: SessionDay,
    /// Slot within the day.
    pub slot: TimeSlot,
}

impl SessionKey {
    /// Combine a day and a slot.
    pub const fn new(day: SessionDay, slot: TimeSlot) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.day, self.slot)
    }
}
