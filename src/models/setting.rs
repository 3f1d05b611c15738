use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// An application-level key/value setting, addressed by its key.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingUpdate {
    pub value: Option<String>,
    pub description: Option<String>,
}

const COLUMNS: &str = "key, value, description, created_at, updated_at";

impl Setting {
    pub const TABLE: &'static str = "settings";

    pub async fn create(pool: &PgPool, new_setting: NewSetting) -> Result<Setting, sqlx::Error> {
        sqlx::query_as::<_, Setting>(&format!(
            "INSERT INTO settings (key, value, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_setting.key)
        .bind(&new_setting.value)
        .bind(new_setting.description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(&format!("SELECT {COLUMNS} FROM settings WHERE key = $1"))
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(&format!("SELECT {COLUMNS} FROM settings ORDER BY key"))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        key: &str,
        changes: SettingUpdate,
    ) -> Result<Setting, sqlx::Error> {
        sqlx::query_as::<_, Setting>(&format!(
            "UPDATE settings \
             SET value = COALESCE($2, value), \
                 description = COALESCE($3, description), \
                 updated_at = NOW() \
             WHERE key = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(key)
        .bind(changes.value)
        .bind(changes.description)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
