//! Session aggregate and its supporting value types.
//!
//! A session is one capacity-limited activity occurrence keyed by its day and
//! time slot. Participants are only ever changed through the booking service;
//! administrative edits touch the descriptive fields and the capacity.

use std::fmt;

mod aggregate;
mod participants;
mod projection;
mod slot;

pub use aggregate::{Session, SessionDraft, SessionPatch};
pub use participants::Participants;
pub use projection::ExternalSession;
pub use slot::{MINUTES_PER_DAY, SessionKey, TimeSlot};

/// Validation errors raised by session constructors and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Slot bounds violate `start < end <= 1440`.
    InvalidSlot {
        /// Requested start minute.
        start_minute: u16,
        /// Requested end minute.
        end_minute: u16,
    },
    /// A slot key string does not follow `SSSS#EEEE`.
    MalformedSlotKey {
        /// Offending key.
        key: String,
    },
    /// Title is blank after trimming.
    BlankTitle,
    /// Capacity must be at least one for new or edited sessions.
    ZeroCapacity,
    /// More participants than seats.
    OverCapacity {
        /// Seat count.
        capacity: u32,
        /// Participant count.
        occupancy: u32,
    },
    /// An edit lowers capacity below the current participant count.
    CapacityBelowOccupancy {
        /// Requested seat count.
        capacity: u32,
        /// Participant count in the fresh snapshot.
        occupancy: u32,
    },
    /// An edit carries no fields.
    EmptyPatch,
    /// The roster head count would not fit in a seat count.
    RosterFull,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlot {
                start_minute,
                end_minute,
            } => write!(
                f,
                "time slot {start_minute}-{end_minute} must satisfy start < end <= {MINUTES_PER_DAY}"
            ),
            Self::MalformedSlotKey { key } => write!(f, "malformed time slot key {key:?}"),
            Self::BlankTitle => write!(f, "session title must not be blank"),
            Self::ZeroCapacity => write!(f, "session capacity must be positive"),
            Self::OverCapacity {
                capacity,
                occupancy,
            } => write!(
                f,
                "session holds {occupancy} participants but only {capacity} seats"
            ),
            Self::CapacityBelowOccupancy {
                capacity,
                occupancy,
            } => write!(
                f,
                "capacity {capacity} is below the current {occupancy} participants"
            ),
            Self::EmptyPatch => write!(f, "session edit must change at least one field"),
            Self::RosterFull => write!(f, "participant roster is full"),
        }
    }
}

impl std::error::Error for SessionValidationError {}
