use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// Classification of family events (wedding, funeral, birth, ...).
/// `is_happy_event` drives whether contributions celebrate or assist.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventType {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_happy_event: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEventType {
    pub name: String,
    pub description: Option<String>,
    pub is_happy_event: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EventTypeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_happy_event: Option<bool>,
}

const COLUMNS: &str = "id, name, description, is_happy_event, created_at, updated_at";

impl EventType {
    pub const TABLE: &'static str = "event_types";

    pub async fn create(pool: &PgPool, new_type: NewEventType) -> Result<EventType, sqlx::Error> {
        sqlx::query_as::<_, EventType>(&format!(
            "INSERT INTO event_types (name, description, is_happy_event) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_type.name)
        .bind(new_type.description)
        .bind(new_type.is_happy_event)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<EventType>, sqlx::Error> {
        sqlx::query_as::<_, EventType>(&format!("SELECT {COLUMNS} FROM event_types WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<EventType>, sqlx::Error> {
        sqlx::query_as::<_, EventType>(&format!(
            "SELECT {COLUMNS} FROM event_types WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<EventType>, sqlx::Error> {
        sqlx::query_as::<_, EventType>(&format!("SELECT {COLUMNS} FROM event_types ORDER BY name"))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: EventTypeUpdate,
    ) -> Result<EventType, sqlx::Error> {
        sqlx::query_as::<_, EventType>(&format!(
            "UPDATE event_types \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 is_happy_event = COALESCE($4, is_happy_event), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.is_happy_event)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
