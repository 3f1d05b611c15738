use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// A scheduled family meeting. Attendance is tracked separately per
/// member in `meeting_attendances`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMeeting {
    #[serde(with = "id_str")]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: DateTime<Utc>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(with = "id_str")]
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFamilyMeeting {
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: DateTime<Utc>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_by_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyMeetingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, title, description, meeting_date, location, start_time, end_time, \
                       created_by_id, created_at, updated_at";

impl FamilyMeeting {
    pub const TABLE: &'static str = "family_meetings";

    pub async fn create(
        pool: &PgPool,
        new_meeting: NewFamilyMeeting,
    ) -> Result<FamilyMeeting, sqlx::Error> {
        sqlx::query_as::<_, FamilyMeeting>(&format!(
            "INSERT INTO family_meetings (title, description, meeting_date, location, \
             start_time, end_time, created_by_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_meeting.title)
        .bind(new_meeting.description)
        .bind(new_meeting.meeting_date)
        .bind(new_meeting.location)
        .bind(new_meeting.start_time)
        .bind(new_meeting.end_time)
        .bind(new_meeting.created_by_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<FamilyMeeting>, sqlx::Error> {
        sqlx::query_as::<_, FamilyMeeting>(&format!(
            "SELECT {COLUMNS} FROM family_meetings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Optional inclusive date-range filter on `meeting_date`.
    pub async fn list(
        pool: &PgPool,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<FamilyMeeting>, sqlx::Error> {
        sqlx::query_as::<_, FamilyMeeting>(&format!(
            "SELECT {COLUMNS} FROM family_meetings \
             WHERE ($1::TIMESTAMPTZ IS NULL OR meeting_date >= $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR meeting_date <= $2) \
             ORDER BY meeting_date DESC"
        ))
        .bind(from_date)
        .bind(to_date)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: FamilyMeetingUpdate,
    ) -> Result<FamilyMeeting, sqlx::Error> {
        sqlx::query_as::<_, FamilyMeeting>(&format!(
            "UPDATE family_meetings \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 meeting_date = COALESCE($4, meeting_date), \
                 location = COALESCE($5, location), \
                 start_time = COALESCE($6, start_time), \
                 end_time = COALESCE($7, end_time), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.meeting_date)
        .bind(changes.location)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM family_meetings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM family_meetings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
