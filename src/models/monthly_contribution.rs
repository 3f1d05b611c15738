use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// A member's contribution for a given month/year. Business rule: at most
/// one record per (user, month, year), enforced by a pre-check query.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyContribution {
    #[serde(with = "id_str")]
    pub id: i64,
    #[serde(with = "id_str")]
    pub user_id: i64,
    pub amount: f64,
    pub month: i32,
    pub year: i32,
    pub payment_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMonthlyContribution {
    pub user_id: i64,
    pub amount: f64,
    pub month: i32,
    pub year: i32,
    pub payment_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MonthlyContributionUpdate {
    pub amount: Option<f64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

const COLUMNS: &str = "id, user_id, amount, month, year, payment_date, payment_method, \
                       transaction_reference, notes, created_at, updated_at";

impl MonthlyContribution {
    pub const TABLE: &'static str = "monthly_contributions";

    pub async fn create(
        pool: &PgPool,
        new_contribution: NewMonthlyContribution,
    ) -> Result<MonthlyContribution, sqlx::Error> {
        sqlx::query_as::<_, MonthlyContribution>(&format!(
            "INSERT INTO monthly_contributions (user_id, amount, month, year, payment_date, \
             payment_method, transaction_reference, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(new_contribution.user_id)
        .bind(new_contribution.amount)
        .bind(new_contribution.month)
        .bind(new_contribution.year)
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
    ) -> Result<Option<MonthlyContribution>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyContribution>(&format!(
            "SELECT {COLUMNS} FROM monthly_contributions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Pre-check for the one-per-(user, month, year) business rule.
    pub async fn find_for_period(
        pool: &PgPool,
        user_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Option<MonthlyContribution>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyContribution>(&format!(
            "SELECT {COLUMNS} FROM monthly_contributions \
             WHERE user_id = $1 AND month = $2 AND year = $3"
        ))
        .bind(user_id)
        .bind(month)
        .bind(year)
        .fetch_optional(pool)
        .await
    }

    /// Filtered listing, newest payments first. `None` filters match
    /// everything.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<i64>,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyContribution>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyContribution>(&format!(
            "SELECT {COLUMNS} FROM monthly_contributions \
             WHERE ($1::BIGINT IS NULL OR user_id = $1) \
               AND ($2::INT IS NULL OR month = $2) \
               AND ($3::INT IS NULL OR year = $3) \
             ORDER BY payment_date DESC"
        ))
        .bind(user_id)
        .bind(month)
        .bind(year)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: MonthlyContributionUpdate,
    ) -> Result<MonthlyContribution, sqlx::Error> {
        sqlx::query_as::<_, MonthlyContribution>(&format!(
            "UPDATE monthly_contributions \
             SET amount = COALESCE($2, amount), \
                 month = COALESCE($3, month), \
                 year = COALESCE($4, year), \
                 payment_date = COALESCE($5, payment_date), \
                 payment_method = COALESCE($6, payment_method), \
                 transaction_reference = COALESCE($7, transaction_reference), \
                 notes = COALESCE($8, notes), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.amount)
        .bind(changes.month)
        .bind(changes.year)
        .bind(changes.payment_date)
        .bind(changes.payment_method)
        .bind(changes.transaction_reference)
        .bind(changes.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monthly_contributions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM monthly_contributions WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }
}
