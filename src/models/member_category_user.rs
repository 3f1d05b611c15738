use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::id_str;

/// Assignment of a user to a member category.
///
/// Addressed by the composite key `(user_id, category_id)`; there is no
/// surrogate id.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberCategoryUser {
    #[serde(with = "id_str")]
    pub user_id: i64,
    #[serde(with = "id_str")]
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "user_id, category_id, created_at";

impl MemberCategoryUser {
    pub const TABLE: &'static str = "member_category_users";

    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        category_id: i64,
    ) -> Result<MemberCategoryUser, sqlx::Error> {
        sqlx::query_as::<_, MemberCategoryUser>(&format!(
            "INSERT INTO member_category_users (user_id, category_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: i64,
        category_id: i64,
    ) -> Result<Option<MemberCategoryUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberCategoryUser>(&format!(
            "SELECT {COLUMNS} FROM member_category_users \
             WHERE user_id = $1 AND category_id = $2"
        ))
        .bind(user_id)
        .bind(category_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Option<i64>,
        category_id: Option<i64>,
    ) -> Result<Vec<MemberCategoryUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberCategoryUser>(&format!(
            "SELECT {COLUMNS} FROM member_category_users \
             WHERE ($1::BIGINT IS NULL OR user_id = $1) \
               AND ($2::BIGINT IS NULL OR category_id = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(
        pool: &PgPool,
        user_id: i64,
        category_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM member_category_users WHERE user_id = $1 AND category_id = $2")
                .bind(user_id)
                .bind(category_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
