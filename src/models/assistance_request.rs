use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{id_str, opt_id_str};

/// A member's request for financial assistance from the fund, optionally
/// tied to an event. Listing goes through the generic list-query builder,
/// so the column list is part of the public surface here.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceRequest {
    #[serde(with = "id_str")]
    pub id: i64,
    #[serde(with = "id_str")]
    pub user_id: i64,
    #[serde(with = "opt_id_str")]
    pub event_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub amount_requested: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAssistanceRequest {
    pub user_id: i64,
    pub event_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub amount_requested: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AssistanceRequestUpdate {
    pub event_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount_requested: Option<f64>,
    pub status: Option<String>,
}

impl AssistanceRequest {
    pub const TABLE: &'static str = "assistance_requests";
    pub const COLUMNS: &'static str =
        "id, user_id, event_id, title, description, amount_requested, status, \
         created_at, updated_at";

    pub async fn create(
        pool: &PgPool,
        new_request: NewAssistanceRequest,
    ) -> Result<AssistanceRequest, sqlx::Error> {
        sqlx::query_as::<_, AssistanceRequest>(&format!(
            "INSERT INTO assistance_requests (user_id, event_id, title, description, \
             amount_requested, status) \
             VALUES ($1, $2, $3, $4, $5, 'pending') \
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(new_request.user_id)
        .bind(new_request.event_id)
        .bind(&new_request.title)
        .bind(new_request.description)
        .bind(new_request.amount_requested)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<AssistanceRequest>, sqlx::Error> {
        sqlx::query_as::<_, AssistanceRequest>(&format!(
            "SELECT {} FROM assistance_requests WHERE id = $1",
            Self::COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: AssistanceRequestUpdate,
    ) -> Result<AssistanceRequest, sqlx::Error> {
        sqlx::query_as::<_, AssistanceRequest>(&format!(
            "UPDATE assistance_requests \
             SET event_id = COALESCE($2, event_id), \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 amount_requested = COALESCE($5, amount_requested), \
                 status = COALESCE($6, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            Self::COLUMNS
        ))
        .bind(id)
        .bind(changes.event_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.amount_requested)
        .bind(changes.status)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assistance_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM assistance_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
