//! Member identity and the snapshot denormalised into session participants.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`MemberId::new`] and [`Member::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberValidationError {
    /// The identifier was empty.
    #[error("member id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("member id must not contain surrounding whitespace")]
    UntrimmedId,
    /// The display name was blank.
    #[error("member display name must not be empty")]
    EmptyDisplayName,
}

/// Opaque member identifier issued by the identity provider.
///
/// # Examples
/// ```
/// use booking::domain::MemberId;
///
/// let id = MemberId::new("naver-12345")?;
/// assert_eq!(id.as_ref(), "naver-12345");
/// # Ok::<(), booking::domain::MemberValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Validate and construct a [`MemberId`].
    ///
    /// # Errors
    ///
    /// Rejects empty identifiers and identifiers with surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, MemberValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(MemberValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(MemberValidationError::UntrimmedId);
        }
        Ok(Self(id))
    }

    /// Generate a random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MemberId> for String {
    fn from(value: MemberId) -> Self {
        value.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = MemberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Member snapshot recorded alongside each reservation.
///
/// The snapshot is copied into the session at booking time and is not kept
/// in sync with later profile edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Member {
    id: MemberId,
    display_name: String,
}

impl Member {
    /// Build a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MemberValidationError::EmptyDisplayName`] for a blank name.
    pub fn new(
        id: MemberId,
        display_name: impl Into<String>,
    ) -> Result<Self, MemberValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(MemberValidationError::EmptyDisplayName);
        }
        Ok(Self { id, display_name })
    }

    /// Member identifier.
    pub const fn id(&self) -> &MemberId {
        &self.id
    }

    /// Name shown to coaches on the participant list.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}
