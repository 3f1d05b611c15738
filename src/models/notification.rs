use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A polymorphic notification. `notifiable_type` + `notifiable_id` point
/// at the record the notification concerns; user-targeted notifications
/// use `notifiable_type = "User"`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub notification_type: String,
    pub notifiable_type: String,
    #[serde(with = "super::id_str")]
    pub notifiable_id: i64,
    pub data: Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub notification_type: String,
    pub notifiable_type: String,
    pub notifiable_id: i64,
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub notification_type: Option<String>,
    pub notifiable_type: Option<String>,
    pub notifiable_id: Option<i64>,
    pub read: Option<bool>,
}

const COLUMNS: &str =
    "id, type, notifiable_type, notifiable_id, data, read_at, created_at, updated_at";

fn mark_read_sql() -> String {
    format!(
        "UPDATE notifications \
         SET read_at = COALESCE(read_at, NOW()), updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    )
}

impl Notification {
    pub const TABLE: &'static str = "notifications";

    pub async fn create(
        pool: &PgPool,
        new_notification: NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (id, type, notifiable_type, notifiable_id, data) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_notification.notification_type)
        .bind(&new_notification.notifiable_type)
        .bind(new_notification.notifiable_id)
        .bind(new_notification.data)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// `read = Some(true)` keeps only notifications with a `read_at`
    /// timestamp, `Some(false)` only unread ones.
    pub async fn list(
        pool: &PgPool,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE ($1::TEXT IS NULL OR type = $1) \
               AND ($2::TEXT IS NULL OR notifiable_type = $2) \
               AND ($3::BIGINT IS NULL OR notifiable_id = $3) \
               AND ($4::BOOLEAN IS NULL OR (read_at IS NOT NULL) = $4) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.notification_type)
        .bind(filter.notifiable_type)
        .bind(filter.notifiable_id)
        .bind(filter.read)
        .fetch_all(pool)
        .await
    }

    /// Idempotent: an already-read notification keeps its original
    /// `read_at` timestamp.
    pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&mark_read_sql())
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_preserves_an_existing_timestamp() {
        let sql = mark_read_sql();
        assert!(sql.contains("read_at = COALESCE(read_at, NOW())"));
        assert_eq!(sql.matches("UPDATE notifications").count(), 1);
    }
}
