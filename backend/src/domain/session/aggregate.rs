//! The session aggregate with its creation and edit payloads.

use serde::Deserialize;

use super::{ExternalSession, Participants, SessionKey, SessionValidationError, TimeSlot};
use crate::domain::{MemberId, SessionDay};

/// Input payload for [`Session::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    /// Day and slot identifying the session.
    pub key: SessionKey,
    /// Headline shown in schedules.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Coach running the session.
    pub coach: String,
    /// Seat count; must be positive.
    pub capacity: u32,
}

/// Administrative edit of a session's descriptive fields and capacity.
///
/// The key and the participants are never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement coach.
    pub coach: Option<String>,
    /// Replacement seat count.
    pub capacity: Option<u32>,
}

impl SessionPatch {
    /// Whether the patch changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.coach.is_none()
            && self.capacity.is_none()
    }
}

/// One scheduled, capacity-limited activity occurrence.
///
/// Sessions built by [`Session::new`] and [`Session::with_participants`]
/// hold at most `capacity` participants. [`Session::restore`] takes the
/// stored state as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    key: SessionKey,
    title: String,
    description: String,
    coach: String,
    capacity: u32,
    participants: Participants,
}

impl Session {
    /// Create a new session with no participants.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::BlankTitle`] or
    /// [`SessionValidationError::ZeroCapacity`].
    pub fn new(draft: SessionDraft) -> Result<Self, SessionValidationError> {
        if draft.title.trim().is_empty() {
            return Err(SessionValidationError::BlankTitle);
        }
        if draft.capacity == 0 {
            return Err(SessionValidationError::ZeroCapacity);
        }
        Ok(Self {
            key: draft.key,
            title: draft.title,
            description: draft.description,
            coach: draft.coach,
            capacity: draft.capacity,
            participants: Participants::new(),
        })
    }

    /// Rebuild a stored session exactly as it was persisted.
    ///
    /// No occupancy check runs here. A stored session may carry a capacity
    /// of zero, or a roster larger than its capacity after a capacity edit
    /// raced a reservation; either way it reports no free seat, and its
    /// members can still cancel.
    pub fn restore(draft: SessionDraft, participants: Participants) -> Self {
        Self {
            key: draft.key,
            title: draft.title,
            description: draft.description,
            coach: draft.coach,
            capacity: draft.capacity,
            participants,
        }
    }

    /// Composite identity.
    pub const fn key(&self) -> SessionKey {
        self.key
    }

    /// Day the session runs on.
    pub const fn day(&self) -> SessionDay {
        self.key.day
    }

    /// Slot within the day.
    pub const fn slot(&self) -> TimeSlot {
        self.key.slot
    }

    /// Headline shown in schedules.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Coach running the session.
    pub fn coach(&self) -> &str {
        self.coach.as_str()
    }

    /// Seat count.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current roster.
    pub const fn participants(&self) -> &Participants {
        &self.participants
    }

    /// Whether `member_id` holds a seat.
    pub fn is_booked(&self, member_id: &MemberId) -> bool {
        self.participants.contains(member_id)
    }

    /// Whether at least one seat is free.
    pub const fn has_free_seat(&self) -> bool {
        self.participants.len() < self.capacity
    }

    /// Copy of this session with a replacement roster.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::OverCapacity`] when the roster does
    /// not fit.
    pub fn with_participants(
        &self,
        participants: Participants,
    ) -> Result<Self, SessionValidationError> {
        check_occupancy(self.capacity, &participants, |capacity, occupancy| {
            SessionValidationError::OverCapacity {
                capacity,
                occupancy,
            }
        })?;
        Ok(Self::restore(self.draft(), participants))
    }

    /// Apply an administrative edit.
    ///
    /// # Errors
    ///
    /// Rejects an empty patch, a blank title, a zero capacity, and a capacity
    /// below the current participant count.
    pub fn apply_patch(&self, patch: &SessionPatch) -> Result<Self, SessionValidationError> {
        if patch.is_empty() {
            return Err(SessionValidationError::EmptyPatch);
        }
        if patch
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(SessionValidationError::BlankTitle);
        }
        if let Some(capacity) = patch.capacity {
            if capacity == 0 {
                return Err(SessionValidationError::ZeroCapacity);
            }
            check_occupancy(capacity, &self.participants, |capacity, occupancy| {
                SessionValidationError::CapacityBelowOccupancy {
                    capacity,
                    occupancy,
                }
            })?;
        }

        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            next.description.clone_from(description);
        }
        if let Some(coach) = &patch.coach {
            next.coach.clone_from(coach);
        }
        if let Some(capacity) = patch.capacity {
            next.capacity = capacity;
        }
        Ok(next)
    }

    /// Project the session for `member_id`, hiding the roster.
    pub fn to_external_view(&self, member_id: &MemberId) -> ExternalSession {
        ExternalSession::project(self, member_id)
    }

    /// Descriptive fields as a draft, used to rebuild the aggregate.
    pub fn draft(&self) -> SessionDraft {
        SessionDraft {
            key: self.key,
            title: self.title.clone(),
            description: self.description.clone(),
            coach: self.coach.clone(),
            capacity: self.capacity,
        }
    }
}

fn check_occupancy(
    capacity: u32,
    participants: &Participants,
    error: impl FnOnce(u32, u32) -> SessionValidationError,
) -> Result<(), SessionValidationError> {
    let occupancy = participants.len();
    if occupancy > capacity {
        return Err(error(capacity, occupancy));
    }
    Ok(())
}
