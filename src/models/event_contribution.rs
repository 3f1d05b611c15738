use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// A one-off contribution tied to a specific event. The (event, user)
/// pair is immutable after creation; only payment details can change.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventContribution {
    #[serde(with = "id_str")]
    pub id: i64,
    #[serde(with = "id_str")]
    pub event_id: i64,
    #[serde(with = "id_str")]
    pub user_id: i64,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEventContribution {
    pub event_id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventContributionUpdate {
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

const COLUMNS: &str = "id, event_id, user_id, amount, payment_date, payment_method, \
                       transaction_reference, notes, created_at, updated_at";

impl EventContribution {
    pub const TABLE: &'static str = "event_contributions";

    pub async fn create(
        pool: &PgPool,
        new_contribution: NewEventContribution,
    ) -> Result<EventContribution, sqlx::Error> {
        sqlx::query_as::<_, EventContribution>(&format!(
            "INSERT INTO event_contributions (event_id, user_id, amount, payment_date, \
             payment_method, transaction_reference, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(new_contribution.event_id)
        .bind(new_contribution.user_id)
        .bind(new_contribution.amount)
        .bind(new_contribution.payment_date)
        .bind(new_contribution.payment_method)
        .bind(new_contribution.transaction_reference)
        .bind(new_contribution.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<EventContribution>, sqlx::Error> {
        sqlx::query_as::<_, EventContribution>(&format!(
            "SELECT {COLUMNS} FROM event_contributions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Filtered listing. `None` filters match everything, so an admin with
    /// no query parameters sees the full table.
    pub async fn list(
        pool: &PgPool,
        event_id: Option<i64>,
        user_id: Option<i64>,
    ) -> Result<Vec<EventContribution>, sqlx::Error> {
        sqlx::query_as::<_, EventContribution>(&format!(
            "SELECT {COLUMNS} FROM event_contributions \
             WHERE ($1::BIGINT IS NULL OR event_id = $1) \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
             ORDER BY payment_date DESC"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: EventContributionUpdate,
    ) -> Result<EventContribution, sqlx::Error> {
        sqlx::query_as::<_, EventContribution>(&format!(
            "UPDATE event_contributions \
             SET amount = COALESCE($2, amount), \
                 payment_date = COALESCE($3, payment_date), \
                 payment_method = COALESCE($4, payment_method), \
                 transaction_reference = COALESCE($5, transaction_reference), \
                 notes = COALESCE($6, notes), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.amount)
        .bind(changes.payment_date)
        .bind(changes.payment_method)
        .bind(changes.transaction_reference)
        .bind(changes.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_contributions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM event_contributions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
