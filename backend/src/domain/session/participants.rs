//! Participant roster keyed by member id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SessionValidationError;
use crate::domain::{Member, MemberId};

type Roster = BTreeMap<MemberId, Member>;

/// Members holding a seat, keyed by id.
///
/// The map is ordered so that its serialised form is canonical: two rosters
/// with the same members always encode to the same JSON, which is what the
/// conditional participant write compares against.
///
/// A roster never holds more than `u32::MAX` members, so its head count is
/// always representable as a seat count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Roster", into = "Roster")]
pub struct Participants {
    members: Roster,
    count: u32,
}

impl Participants {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from member snapshots; later duplicates replace
    /// earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::RosterFull`] when the distinct
    /// members do not fit in a `u32` head count.
    pub fn from_members(
        members: impl IntoIterator<Item = Member>,
    ) -> Result<Self, SessionValidationError> {
        let roster: Roster = members
            .into_iter()
            .map(|member| (member.id().clone(), member))
            .collect();
        Self::try_from(roster)
    }

    /// Whether `member_id` holds a seat.
    pub fn contains(&self, member_id: &MemberId) -> bool {
        self.members.contains_key(member_id)
    }

    /// Number of seats taken.
    pub const fn len(&self) -> u32 {
        self.count
    }

    /// Whether nobody holds a seat.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Snapshot of one participant.
    pub fn get(&self, member_id: &MemberId) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// Participants in id order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Copy of this roster with `member` added (or its snapshot replaced).
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::RosterFull`] when a new member would
    /// overflow the head count.
    pub fn with_member(&self, member: Member) -> Result<Self, SessionValidationError> {
        let count = if self.contains(member.id()) {
            self.count
        } else {
            self.count
                .checked_add(1)
                .ok_or(SessionValidationError::RosterFull)?
        };
        let mut members = self.members.clone();
        members.insert(member.id().clone(), member);
        Ok(Self { members, count })
    }

    /// Copy of this roster without `member_id`.
    #[must_use]
    pub fn without_member(&self, member_id: &MemberId) -> Self {
        let mut members = self.members.clone();
        let count = match members.remove(member_id) {
            Some(_) => self.count.saturating_sub(1),
            None => self.count,
        };
        Self { members, count }
    }
}

impl TryFrom<Roster> for Participants {
    type Error = SessionValidationError;

    fn try_from(members: Roster) -> Result<Self, Self::Error> {
        let count =
            u32::try_from(members.len()).map_err(|_| SessionValidationError::RosterFull)?;
        Ok(Self { members, count })
    }
}

impl From<Participants> for Roster {
    fn from(value: Participants) -> Self {
        value.members
    }
}
