//! # Member Category Assignment Handlers
//!
//! Composite-key resource: a row is addressed by `(userId, categoryId)`.
//! Admin-only end to end.

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::{MemberCategory, MemberCategoryUser, User};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

const DUPLICATE_ASSIGNMENT: &str = "Cet utilisateur est déjà assigné à cette catégorie.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListParams {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// `POST /api/member-category-users` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require("userId", payload.user_id.is_some(), "L'ID de l'utilisateur est requis.")
        .require(
            "categoryId",
            payload.category_id.is_some(),
            "L'ID de la catégorie est requise.",
        )
        .check()?;

    let user_id = payload.user_id.unwrap_or_default();
    let category_id = payload.category_id.unwrap_or_default();

    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found("Utilisateur introuvable."));
    }
    if MemberCategory::find_by_id(&state.pool, category_id).await?.is_none() {
        return Err(ApiError::not_found("Catégorie de membre introuvable."));
    }
    if MemberCategoryUser::find(&state.pool, user_id, category_id).await?.is_some() {
        return Err(ApiError::conflict(DUPLICATE_ASSIGNMENT));
    }

    let assignment = MemberCategoryUser::create(&state.pool, user_id, category_id).await?;
    Ok(responses::created(
        "Utilisateur assigné à la catégorie avec succès.",
        "assignment",
        &assignment,
    ))
}

/// `GET /api/member-category-users` (admin; `userId`/`categoryId` filters)
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<AssignmentListParams>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let assignments =
        MemberCategoryUser::list(&state.pool, params.user_id, params.category_id).await?;
    Ok(Json(assignments).into_response())
}

/// `GET /api/member-category-users/:userId/:categoryId` (admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((user_id, category_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let assignment = MemberCategoryUser::find(&state.pool, user_id, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignation utilisateur-catégorie introuvable."))?;
    Ok(Json(assignment).into_response())
}

/// `DELETE /api/member-category-users/:userId/:categoryId` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((user_id, category_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if !MemberCategoryUser::delete(&state.pool, user_id, category_id).await? {
        return Err(ApiError::not_found(
            "Assignation utilisateur-catégorie introuvable.",
        ));
    }
    Ok(responses::deleted("Utilisateur dissocié de la catégorie avec succès."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_duplicate_assignment_is_a_conflict() {
        let (status, message) = ApiError::conflict(DUPLICATE_ASSIGNMENT).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Cet utilisateur est déjà assigné à cette catégorie.");
    }
}
