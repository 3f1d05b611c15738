use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{id_str, opt_id_str};

/// A disciplinary sanction against a member, issued by an admin and
/// optionally resolved later.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sanction {
    #[serde(with = "id_str")]
    pub id: i64,
    #[serde(with = "id_str")]
    pub user_id: i64,
    pub reason: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(with = "id_str")]
    pub created_by_id: i64,
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(with = "opt_id_str")]
    pub resolved_by_id: Option<i64>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSanction {
    pub user_id: i64,
    pub reason: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SanctionUpdate {
    pub reason: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by_id: Option<i64>,
    pub resolution_notes: Option<String>,
}

const COLUMNS: &str = "id, user_id, reason, start_date, end_date, created_by_id, resolved_at, \
                       resolved_by_id, resolution_notes, created_at, updated_at";

impl Sanction {
    pub const TABLE: &'static str = "sanctions";

    pub async fn create(pool: &PgPool, new_sanction: NewSanction) -> Result<Sanction, sqlx::Error> {
        sqlx::query_as::<_, Sanction>(&format!(
            "INSERT INTO sanctions (user_id, reason, start_date, end_date, created_by_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(new_sanction.user_id)
        .bind(&new_sanction.reason)
        .bind(new_sanction.start_date)
        .bind(new_sanction.end_date)
        .bind(new_sanction.created_by_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Sanction>, sqlx::Error> {
        sqlx::query_as::<_, Sanction>(&format!("SELECT {COLUMNS} FROM sanctions WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `resolved = Some(true)` keeps only resolved sanctions,
    /// `Some(false)` only outstanding ones.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<i64>,
        resolved: Option<bool>,
    ) -> Result<Vec<Sanction>, sqlx::Error> {
        sqlx::query_as::<_, Sanction>(&format!(
            "SELECT {COLUMNS} FROM sanctions \
             WHERE ($1::BIGINT IS NULL OR user_id = $1) \
               AND ($2::BOOLEAN IS NULL OR (resolved_at IS NOT NULL) = $2) \
             ORDER BY start_date DESC"
        ))
        .bind(user_id)
        .bind(resolved)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: SanctionUpdate,
    ) -> Result<Sanction, sqlx::Error> {
        sqlx::query_as::<_, Sanction>(&format!(
            "UPDATE sanctions \
             SET reason = COALESCE($2, reason), \
                 start_date = COALESCE($3, start_date), \
                 end_date = COALESCE($4, end_date), \
                 resolved_at = COALESCE($5, resolved_at), \
                 resolved_by_id = COALESCE($6, resolved_by_id), \
                 resolution_notes = COALESCE($7, resolution_notes), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.reason)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.resolved_at)
        .bind(changes.resolved_by_id)
        .bind(changes.resolution_notes)
        .fetch_one(pool)
        .await
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM sanctions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sanctions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
