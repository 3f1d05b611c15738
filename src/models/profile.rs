use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{id_str, opt_id_str};

/// Extended member information, one record per user.
///
/// `parent_id` links child profiles to the responsible member.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(with = "id_str")]
    pub id: i64,
    #[serde(with = "id_str")]
    pub user_id: i64,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_path: Option<String>,
    pub is_married: bool,
    pub is_employed: bool,
    pub is_civil_servant: bool,
    #[serde(with = "opt_id_str")]
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: i64,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_path: Option<String>,
    pub is_married: bool,
    pub is_employed: bool,
    pub is_civil_servant: bool,
    pub parent_id: Option<i64>,
}

/// Partial update. `parent_id` is double-optional: `None` leaves the
/// parent link untouched, `Some(None)` clears it, `Some(Some(id))`
/// reassigns it. Everything lands in one UPDATE statement.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_path: Option<String>,
    pub is_married: Option<bool>,
    pub is_employed: Option<bool>,
    pub is_civil_servant: Option<bool>,
    pub parent_id: Option<Option<i64>>,
}

const COLUMNS: &str = "id, user_id, phone_number, address, date_of_birth, profile_photo_path, \
                       is_married, is_employed, is_civil_servant, parent_id, created_at, updated_at";

fn update_sql() -> String {
    format!(
        "UPDATE profiles \
         SET phone_number = COALESCE($2, phone_number), \
             address = COALESCE($3, address), \
             date_of_birth = COALESCE($4, date_of_birth), \
             profile_photo_path = COALESCE($5, profile_photo_path), \
             is_married = COALESCE($6, is_married), \
             is_employed = COALESCE($7, is_employed), \
             is_civil_servant = COALESCE($8, is_civil_servant), \
             parent_id = CASE WHEN $9 THEN $10 ELSE parent_id END, \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    )
}

impl Profile {
    pub const TABLE: &'static str = "profiles";

    pub async fn create(pool: &PgPool, new_profile: NewProfile) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id, phone_number, address, date_of_birth, \
             profile_photo_path, is_married, is_employed, is_civil_servant, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(new_profile.user_id)
        .bind(new_profile.phone_number)
        .bind(new_profile.address)
        .bind(new_profile.date_of_birth)
        .bind(new_profile.profile_photo_path)
        .bind(new_profile.is_married)
        .bind(new_profile.is_employed)
        .bind(new_profile.is_civil_servant)
        .bind(new_profile.parent_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(pool: &PgPool, user_id: i64) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update as a single UPDATE statement. The parent
    /// link is driven by a flag/value bind pair ($9/$10) so that clearing
    /// to NULL, reassigning and leaving untouched all go through the same
    /// statement.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: ProfileUpdate,
    ) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&update_sql())
            .bind(id)
            .bind(changes.phone_number)
            .bind(changes.address)
            .bind(changes.date_of_birth)
            .bind(changes.profile_photo_path)
            .bind(changes.is_married)
            .bind(changes.is_employed)
            .bind(changes.is_civil_servant)
            .bind(changes.parent_id.is_some())
            .bind(changes.parent_id.flatten())
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
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
    fn test_update_is_a_single_statement_including_the_parent_link() {
        let sql = update_sql();
        assert_eq!(sql.matches("UPDATE profiles").count(), 1);
        assert!(sql.contains("parent_id = CASE WHEN $9 THEN $10 ELSE parent_id END"));
        assert!(!sql.contains(';'));
    }

    #[test]
    fn test_parent_flag_and_value_binds() {
        let untouched = ProfileUpdate::default();
        assert!(!untouched.parent_id.is_some());
        assert_eq!(untouched.parent_id.flatten(), None);

        let cleared = ProfileUpdate {
            parent_id: Some(None),
            ..ProfileUpdate::default()
        };
        assert!(cleared.parent_id.is_some());
        assert_eq!(cleared.parent_id.flatten(), None);

        let reassigned = ProfileUpdate {
            parent_id: Some(Some(7)),
            ..ProfileUpdate::default()
        };
        assert!(reassigned.parent_id.is_some());
        assert_eq!(reassigned.parent_id.flatten(), Some(7));
    }
}
