use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{id_str, opt_id_str};

/// A ledger entry for the association fund. At most one of the three
/// source links may be set, tying the entry back to the record that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FundTransaction {
    #[serde(with = "id_str")]
    pub id: i64,
    pub transaction_type: String,
    pub amount: f64,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub balance_after: f64,
    #[serde(with = "id_str")]
    pub created_by_id: i64,
    #[serde(with = "opt_id_str")]
    pub monthly_contribution_id: Option<i64>,
    #[serde(with = "opt_id_str")]
    pub event_contribution_id: Option<i64>,
    #[serde(with = "opt_id_str")]
    pub assistance_request_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFundTransaction {
    pub transaction_type: String,
    pub amount: f64,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub balance_after: f64,
    pub created_by_id: i64,
    pub monthly_contribution_id: Option<i64>,
    pub event_contribution_id: Option<i64>,
    pub assistance_request_id: Option<i64>,
}

impl NewFundTransaction {
    /// Number of source links set on this entry. Handlers reject anything
    /// above one.
    pub fn linked_source_count(&self) -> usize {
        [
            self.monthly_contribution_id.is_some(),
            self.event_contribution_id.is_some(),
            self.assistance_request_id.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FundTransactionUpdate {
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub balance_after: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FundTransactionFilter {
    pub transaction_type: Option<String>,
    pub created_by_id: Option<i64>,
    pub monthly_contribution_id: Option<i64>,
    pub event_contribution_id: Option<i64>,
    pub assistance_request_id: Option<i64>,
}

const COLUMNS: &str = "id, transaction_type, amount, description, transaction_date, \
                       balance_after, created_by_id, monthly_contribution_id, \
                       event_contribution_id, assistance_request_id, created_at";

impl FundTransaction {
    pub const TABLE: &'static str = "fund_transactions";

    pub async fn create(
        pool: &PgPool,
        new_transaction: NewFundTransaction,
    ) -> Result<FundTransaction, sqlx::Error> {
        sqlx::query_as::<_, FundTransaction>(&format!(
            "INSERT INTO fund_transactions (transaction_type, amount, description, \
             transaction_date, balance_after, created_by_id, monthly_contribution_id, \
             event_contribution_id, assistance_request_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_transaction.transaction_type)
        .bind(new_transaction.amount)
        .bind(new_transaction.description)
        .bind(new_transaction.transaction_date)
        .bind(new_transaction.balance_after)
        .bind(new_transaction.created_by_id)
        .bind(new_transaction.monthly_contribution_id)
        .bind(new_transaction.event_contribution_id)
        .bind(new_transaction.assistance_request_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<FundTransaction>, sqlx::Error> {
        sqlx::query_as::<_, FundTransaction>(&format!(
            "SELECT {COLUMNS} FROM fund_transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: FundTransactionFilter,
    ) -> Result<Vec<FundTransaction>, sqlx::Error> {
        sqlx::query_as::<_, FundTransaction>(&format!(
            "SELECT {COLUMNS} FROM fund_transactions \
             WHERE ($1::TEXT IS NULL OR transaction_type = $1) \
               AND ($2::BIGINT IS NULL OR created_by_id = $2) \
               AND ($3::BIGINT IS NULL OR monthly_contribution_id = $3) \
               AND ($4::BIGINT IS NULL OR event_contribution_id = $4) \
               AND ($5::BIGINT IS NULL OR assistance_request_id = $5) \
             ORDER BY transaction_date DESC"
        ))
        .bind(filter.transaction_type)
        .bind(filter.created_by_id)
        .bind(filter.monthly_contribution_id)
        .bind(filter.event_contribution_id)
        .bind(filter.assistance_request_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: FundTransactionUpdate,
    ) -> Result<FundTransaction, sqlx::Error> {
        sqlx::query_as::<_, FundTransaction>(&format!(
            "UPDATE fund_transactions \
             SET transaction_type = COALESCE($2, transaction_type), \
                 amount = COALESCE($3, amount), \
                 description = COALESCE($4, description), \
                 transaction_date = COALESCE($5, transaction_date), \
                 balance_after = COALESCE($6, balance_after) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.transaction_type)
        .bind(changes.amount)
        .bind(changes.description)
        .bind(changes.transaction_date)
        .bind(changes.balance_after)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fund_transactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry() -> NewFundTransaction {
        NewFundTransaction {
            transaction_type: "credit".to_string(),
            amount: 50.0,
            description: None,
            transaction_date: Utc::now(),
            balance_after: 150.0,
            created_by_id: 1,
            monthly_contribution_id: None,
            event_contribution_id: None,
            assistance_request_id: None,
        }
    }

    #[test]
    fn counts_linked_sources() {
        let mut tx = entry();
        assert_eq!(tx.linked_source_count(), 0);

        tx.monthly_contribution_id = Some(7);
        assert_eq!(tx.linked_source_count(), 1);

        tx.assistance_request_id = Some(9);
        assert_eq!(tx.linked_source_count(), 2);
    }
}
