use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// A member's attendance record for a meeting, addressed by the composite
/// key `(user_id, meeting_id)`. Status defaults to "absent" until the
/// member confirms otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAttendance {
    #[serde(with = "id_str")]
    pub user_id: i64,
    #[serde(with = "id_str")]
    pub meeting_id: i64,
    pub attendance_status: String,
    pub excuse_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMeetingAttendance {
    pub user_id: i64,
    pub meeting_id: i64,
    pub attendance_status: Option<String>,
    pub excuse_reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MeetingAttendanceUpdate {
    pub attendance_status: Option<String>,
    pub excuse_reason: Option<String>,
}

const COLUMNS: &str =
    "user_id, meeting_id, attendance_status, excuse_reason, created_at, updated_at";

impl MeetingAttendance {
    pub const TABLE: &'static str = "meeting_attendances";

    pub async fn create(
        pool: &PgPool,
        new_attendance: NewMeetingAttendance,
    ) -> Result<MeetingAttendance, sqlx::Error> {
        sqlx::query_as::<_, MeetingAttendance>(&format!(
            "INSERT INTO meeting_attendances (user_id, meeting_id, attendance_status, \
             excuse_reason) \
             VALUES ($1, $2, COALESCE($3, 'absent'), $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(new_attendance.user_id)
        .bind(new_attendance.meeting_id)
        .bind(new_attendance.attendance_status)
        .bind(new_attendance.excuse_reason)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        meeting_id: i64,
        user_id: i64,
    ) -> Result<Option<MeetingAttendance>, sqlx::Error> {
        sqlx::query_as::<_, MeetingAttendance>(&format!(
            "SELECT {COLUMNS} FROM meeting_attendances \
             WHERE meeting_id = $1 AND user_id = $2"
        ))
        .bind(meeting_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        meeting_id: Option<i64>,
        user_id: Option<i64>,
        status: Option<String>,
    ) -> Result<Vec<MeetingAttendance>, sqlx::Error> {
        sqlx::query_as::<_, MeetingAttendance>(&format!(
            "SELECT {COLUMNS} FROM meeting_attendances \
             WHERE ($1::BIGINT IS NULL OR meeting_id = $1) \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
               AND ($3::TEXT IS NULL OR attendance_status = $3) \
             ORDER BY created_at DESC"
        ))
        .bind(meeting_id)
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        meeting_id: i64,
        user_id: i64,
        changes: MeetingAttendanceUpdate,
    ) -> Result<MeetingAttendance, sqlx::Error> {
        sqlx::query_as::<_, MeetingAttendance>(&format!(
            "UPDATE meeting_attendances \
             SET attendance_status = COALESCE($3, attendance_status), \
                 excuse_reason = COALESCE($4, excuse_reason), \
                 updated_at = NOW() \
             WHERE meeting_id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(meeting_id)
        .bind(user_id)
        .bind(changes.attendance_status)
        .bind(changes.excuse_reason)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, meeting_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM meeting_attendances WHERE meeting_id = $1 AND user_id = $2")
                .bind(meeting_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
