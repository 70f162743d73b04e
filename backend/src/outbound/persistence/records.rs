//! Stored item shapes for sessions and history entries.
//!
//! Records are internal to the persistence adapters and never reach the
//! domain. Attributes are camelCase JSON; `participants` is stored as one
//! object so the conditional roster write can compare it as a whole.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    BookingHistoryEntry, ExternalSession, HistorySortKey, MemberId, Participants, Session,
    SessionDay, SessionDraft, SessionKey, SessionPatch, TimeSlot,
};
use crate::outbound::kv_store::{Item, ItemKey};

/// Roster attribute compared by conditional writes.
pub(crate) const PARTICIPANTS_ATTR: &str = "participants";
/// Seat-count attribute bounded by conditional writes.
pub(crate) const CAPACITY_ATTR: &str = "capacity";

/// Failure to convert between records and items or domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub(crate) struct RecordError {
    message: String,
}

impl RecordError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub(crate) fn to_item<T: Serialize>(record: &T) -> Result<Item, RecordError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(item)) => Ok(item),
        Ok(other) => Err(RecordError::new(format!(
            "record serialised to a non-object value: {other}"
        ))),
        Err(err) => Err(RecordError::new(format!("failed to serialise record: {err}"))),
    }
}

pub(crate) fn from_item<T: DeserializeOwned>(item: Item) -> Result<T, RecordError> {
    serde_json::from_value(Value::Object(item))
        .map_err(|err| RecordError::new(format!("failed to deserialise record: {err}")))
}

/// Partition key of a day: the zero-padded epoch day.
pub(crate) fn day_partition(day: SessionDay) -> String {
    format!("{:06}", day.epoch_day())
}

pub(crate) fn session_item_key(key: SessionKey) -> ItemKey {
    ItemKey::new(day_partition(key.day), key.slot.key())
}

pub(crate) fn history_item_key(member_id: &MemberId, sort_key: &HistorySortKey) -> ItemKey {
    ItemKey::new(member_id.to_string(), sort_key.as_str())
}

/// Stored form of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionRecord {
    pub day: SessionDay,
    pub start_minute: u16,
    pub end_minute: u16,
    pub title: String,
    pub description: String,
    pub coach: String,
    pub capacity: u32,
    pub participants: Participants,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            day: session.day(),
            start_minute: session.slot().start_minute(),
            end_minute: session.slot().end_minute(),
            title: session.title().to_owned(),
            description: session.description().to_owned(),
            coach: session.coach().to_owned(),
            capacity: session.capacity(),
            participants: session.participants().clone(),
        }
    }
}

impl TryFrom<SessionRecord> for Session {
    type Error = RecordError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let slot = TimeSlot::new(record.start_minute, record.end_minute)
            .map_err(|err| RecordError::new(format!("stored session has {err}")))?;
        Ok(Self::restore(
            SessionDraft {
                key: SessionKey::new(record.day, slot),
                title: record.title,
                description: record.description,
                coach: record.coach,
                capacity: record.capacity,
            },
            record.participants,
        ))
    }
}

/// Attributes written by an administrative edit.
pub(crate) fn patch_values(patch: &SessionPatch) -> Item {
    let mut values = Item::new();
    if let Some(title) = &patch.title {
        values.insert("title".to_owned(), Value::from(title.as_str()));
    }
    if let Some(description) = &patch.description {
        values.insert("description".to_owned(), Value::from(description.as_str()));
    }
    if let Some(coach) = &patch.coach {
        values.insert("coach".to_owned(), Value::from(coach.as_str()));
    }
    if let Some(capacity) = patch.capacity {
        values.insert(CAPACITY_ATTR.to_owned(), Value::from(capacity));
    }
    values
}

/// `session` with the patched fields replaced and its roster kept, mirroring
/// what [`patch_values`] merges into the stored item.
pub(crate) fn patched(session: &Session, patch: &SessionPatch) -> Session {
    let mut draft = session.draft();
    if let Some(title) = &patch.title {
        draft.title.clone_from(title);
    }
    if let Some(description) = &patch.description {
        draft.description.clone_from(description);
    }
    if let Some(coach) = &patch.coach {
        draft.coach.clone_from(coach);
    }
    if let Some(capacity) = patch.capacity {
        draft.capacity = capacity;
    }
    Session::restore(draft, session.participants().clone())
}

/// Stored form of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryRecord {
    pub member_id: MemberId,
    pub sort_key: HistorySortKey,
    pub session: ExternalSession,
}

impl From<&BookingHistoryEntry> for HistoryRecord {
    fn from(entry: &BookingHistoryEntry) -> Self {
        Self {
            member_id: entry.member_id().clone(),
            sort_key: entry.sort_key().clone(),
            session: entry.session().clone(),
        }
    }
}

impl TryFrom<HistoryRecord> for BookingHistoryEntry {
    type Error = RecordError;

    fn try_from(record: HistoryRecord) -> Result<Self, Self::Error> {
        let entry = Self::new(record.member_id, record.session);
        if entry.sort_key() != &record.sort_key {
            return Err(RecordError::new(format!(
                "stored sort key {} does not match session {}",
                record.sort_key,
                entry.sort_key()
            )));
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for record conversions.

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::Member;

    #[fixture]
    fn session() -> Session {
        let member = Member::new(MemberId::new("m-1").expect("valid id"), "Kim")
            .expect("valid member");
        Session::new(SessionDraft {
            key: SessionKey::new(
                SessionDay::from_epoch_day(19_000).expect("valid day"),
                TimeSlot::new(540, 600).expect("valid slot"),
            ),
            title: "Rowing".to_owned(),
            description: "Intervals".to_owned(),
            coach: "Ola".to_owned(),
            capacity: 3,
        })
        .and_then(|s| {
            Participants::new()
                .with_member(member)
                .and_then(|roster| s.with_participants(roster))
        })
        .expect("valid session")
    }

    #[rstest]
    fn session_items_use_camel_case_attributes(session: Session) {
        let item = to_item(&SessionRecord::from(&session)).expect("serialise");
        assert_eq!(
            Value::Object(item),
            json!({
                "day": 19_000,
                "startMinute": 540,
                "endMinute": 600,
                "title": "Rowing",
                "description": "Intervals",
                "coach": "Ola",
                "capacity": 3,
                "participants": {
                    "m-1": { "id": "m-1", "displayName": "Kim" }
                },
            })
        );
    }

    #[rstest]
    fn session_items_restore_the_aggregate(session: Session) {
        let item = to_item(&SessionRecord::from(&session)).expect("serialise");
        let record: SessionRecord = from_item(item).expect("deserialise");
        assert_eq!(Session::try_from(record), Ok(session));
    }

    #[rstest]
    fn overfull_items_still_load(session: Session) {
        let mut record = SessionRecord::from(&session);
        record.capacity = 0;

        let restored = Session::try_from(record).expect("overfull sessions load");

        assert_eq!(restored.participants(), session.participants());
        assert!(!restored.has_free_seat());
    }

    #[rstest]
    fn patched_sessions_match_the_merged_item(session: Session) {
        let patch = SessionPatch {
            title: Some("Sculling".to_owned()),
            capacity: Some(1),
            ..SessionPatch::default()
        };
        let mut item = to_item(&SessionRecord::from(&session)).expect("serialise");
        item.extend(patch_values(&patch));
        let record: SessionRecord = from_item(item).expect("deserialise");

        assert_eq!(Session::try_from(record), Ok(patched(&session, &patch)));
    }

    #[rstest]
    fn keys_are_zero_padded(session: Session) {
        assert_eq!(
            session_item_key(session.key()),
            ItemKey::new("019000", "0540#0600")
        );
    }

    #[rstest]
    fn patch_values_hold_only_given_fields() {
        let values = patch_values(&SessionPatch {
            coach: Some("Noa".to_owned()),
            capacity: Some(8),
            ..SessionPatch::default()
        });
        assert_eq!(Value::Object(values), json!({"coach": "Noa", "capacity": 8}));
    }

    #[rstest]
    fn history_records_reject_mismatched_sort_keys(session: Session) {
        let member_id = MemberId::new("m-1").expect("valid id");
        let entry =
            BookingHistoryEntry::new(member_id.clone(), session.to_external_view(&member_id));
        let mut record = HistoryRecord::from(&entry);
        record.sort_key = HistorySortKey::parse("000001#0000#0030").expect("valid key");
        assert!(BookingHistoryEntry::try_from(record).is_err());
    }
}
