use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{id_str, opt_id_str};

/// A family event. Private events are only visible to admins, the creator
/// and the concerned user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(with = "id_str")]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "id_str")]
    pub event_type_id: i64,
    #[serde(with = "id_str")]
    pub created_by_id: i64,
    #[serde(with = "opt_id_str")]
    pub concerned_user_id: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub contribution_required: bool,
    pub is_private: bool,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type_id: i64,
    pub created_by_id: i64,
    pub concerned_user_id: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub contribution_required: bool,
    pub is_private: bool,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type_id: Option<i64>,
    pub concerned_user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub contribution_required: Option<bool>,
    pub is_private: Option<bool>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
}

const COLUMNS: &str = "id, title, description, location, event_type_id, created_by_id, \
                       concerned_user_id, start_date, end_date, is_active, contribution_required, \
                       is_private, is_recurring, recurrence_pattern, created_at, updated_at";

impl Event {
    pub const TABLE: &'static str = "events";

    pub async fn create(pool: &PgPool, new_event: NewEvent) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (title, description, location, event_type_id, created_by_id, \
             concerned_user_id, start_date, end_date, is_active, contribution_required, \
             is_private, is_recurring, recurrence_pattern) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_event.title)
        .bind(new_event.description)
        .bind(new_event.location)
        .bind(new_event.event_type_id)
        .bind(new_event.created_by_id)
        .bind(new_event.concerned_user_id)
        .bind(new_event.start_date)
        .bind(new_event.end_date)
        .bind(new_event.is_active)
        .bind(new_event.contribution_required)
        .bind(new_event.is_private)
        .bind(new_event.is_recurring)
        .bind(new_event.recurrence_pattern)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {COLUMNS} FROM events ORDER BY start_date DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Events visible to a non-admin member: public events plus their own
    /// and those that concern them.
    pub async fn list_visible_to(pool: &PgPool, user_id: i64) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {COLUMNS} FROM events \
             WHERE is_private = FALSE OR created_by_id = $1 OR concerned_user_id = $1 \
             ORDER BY start_date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(pool: &PgPool, id: i64, changes: EventUpdate) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "UPDATE events \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 location = COALESCE($4, location), \
                 event_type_id = COALESCE($5, event_type_id), \
                 concerned_user_id = COALESCE($6, concerned_user_id), \
                 start_date = COALESCE($7, start_date), \
                 end_date = COALESCE($8, end_date), \
                 is_active = COALESCE($9, is_active), \
                 contribution_required = COALESCE($10, contribution_required), \
                 is_private = COALESCE($11, is_private), \
                 is_recurring = COALESCE($12, is_recurring), \
                 recurrence_pattern = COALESCE($13, recurrence_pattern), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.event_type_id)
        .bind(changes.concerned_user_id)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.is_active)
        .bind(changes.contribution_required)
        .bind(changes.is_private)
        .bind(changes.is_recurring)
        .bind(changes.recurrence_pattern)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
