use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// A contribution tier (e.g. worker, student, elder) with its expected
/// monthly amount.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberCategory {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub monthly_contribution_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMemberCategory {
    pub name: String,
    pub description: Option<String>,
    pub monthly_contribution_amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MemberCategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_contribution_amount: Option<f64>,
}

const COLUMNS: &str = "id, name, description, monthly_contribution_amount, created_at, updated_at";

impl MemberCategory {
    pub const TABLE: &'static str = "member_categories";

    pub async fn create(
        pool: &PgPool,
        new_category: NewMemberCategory,
    ) -> Result<MemberCategory, sqlx::Error> {
        sqlx::query_as::<_, MemberCategory>(&format!(
            "INSERT INTO member_categories (name, description, monthly_contribution_amount) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_category.name)
        .bind(new_category.description)
        .bind(new_category.monthly_contribution_amount)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<MemberCategory>, sqlx::Error> {
        sqlx::query_as::<_, MemberCategory>(&format!(
            "SELECT {COLUMNS} FROM member_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<MemberCategory>, sqlx::Error> {
        sqlx::query_as::<_, MemberCategory>(&format!(
            "SELECT {COLUMNS} FROM member_categories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<MemberCategory>, sqlx::Error> {
        sqlx::query_as::<_, MemberCategory>(&format!(
            "SELECT {COLUMNS} FROM member_categories ORDER BY name"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: MemberCategoryUpdate,
    ) -> Result<MemberCategory, sqlx::Error> {
        sqlx::query_as::<_, MemberCategory>(&format!(
            "UPDATE member_categories \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 monthly_contribution_amount = COALESCE($4, monthly_contribution_amount), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.monthly_contribution_amount)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM member_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
