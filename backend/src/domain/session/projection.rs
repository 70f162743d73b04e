//! Member-facing projection of a session.

use serde::{Deserialize, Serialize};

use super::{Session, TimeSlot};
use crate::domain::{MemberId, SessionDay};

/// Session as seen by one member.
///
/// The roster is replaced by a head count and a flag telling whether the
/// viewing member holds a seat. This is the only form in which session
/// state leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSession {
    day: SessionDay,
    #[serde(flatten)]
    slot: TimeSlot,
    title: String,
    description: String,
    capacity: u32,
    coach: String,
    participants_count: u32,
    is_booked: bool,
}

impl ExternalSession {
    pub(super) fn project(session: &Session, member_id: &MemberId) -> Self {
        Self {
            day: session.day(),
            slot: session.slot(),
            title: session.title().to_owned(),
            description: session.description().to_owned(),
            capacity: session.capacity(),
            coach: session.coach().to_owned(),
            participants_count: session.participants().len(),
            is_booked: session.is_booked(member_id),
        }
    }

    /// Day the session runs on.
    pub const fn day(&self) -> SessionDay {
        self.day
    }

    /// Slot within the day.
    pub const fn slot(&self) -> TimeSlot {
        self.slot
    }

    /// Headline shown in schedules.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Seat count.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Coach running the session.
    pub fn coach(&self) -> &str {
        self.coach.as_str()
    }

    /// Seats taken when the projection was made.
    pub const fn participants_count(&self) -> u32 {
        self.participants_count
    }

    /// Whether the viewing member holds a seat.
    pub const fn is_booked(&self) -> bool {
        self.is_booked
    }
}
