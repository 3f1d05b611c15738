//! # Data Layer
//!
//! One SQLx-backed record type per entity. Each model owns its CRUD queries
//! and takes the shared [`sqlx::PgPool`] by reference; nothing here holds
//! connection state. Storage-level constraints (unique email, one profile
//! per user, composite keys) live in the database; models add the pre-check
//! queries the handlers rely on.

pub mod assistance_request;
pub mod event;
pub mod event_contribution;
pub mod event_type;
pub mod family_meeting;
pub mod fund_transaction;
pub mod meeting_attendance;
pub mod member_category;
pub mod member_category_user;
pub mod monthly_contribution;
pub mod notification;
pub mod profile;
pub mod sanction;
pub mod setting;
pub mod user;

pub use assistance_request::AssistanceRequest;
pub use event::Event;
pub use event_contribution::EventContribution;
pub use event_type::EventType;
pub use family_meeting::FamilyMeeting;
pub use fund_transaction::FundTransaction;
pub use meeting_attendance::MeetingAttendance;
pub use member_category::MemberCategory;
pub use member_category_user::MemberCategoryUser;
pub use monthly_contribution::MonthlyContribution;
pub use notification::Notification;
pub use profile::Profile;
pub use sanction::Sanction;
pub use setting::Setting;
pub use user::User;

/// Serialize 64-bit identifiers as JSON strings.
///
/// JavaScript clients cannot represent the full `BIGINT` range in a JSON
/// number, so every id crosses the wire as a string.
pub mod id_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// [`id_str`] for optional foreign keys.
pub mod opt_id_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| s.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record {
        #[serde(with = "super::id_str")]
        id: i64,
        #[serde(with = "super::opt_id_str")]
        parent_id: Option<i64>,
    }

    #[test]
    fn test_big_ids_serialize_as_strings() {
        let record = Record {
            id: 9_007_199_254_740_993, // beyond Number.MAX_SAFE_INTEGER
            parent_id: Some(42),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "9007199254740993");
        assert_eq!(json["parent_id"], "42");
    }

    #[test]
    fn test_absent_foreign_key_serializes_as_null() {
        let record = Record {
            id: 1,
            parent_id: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["parent_id"].is_null());
    }
}
