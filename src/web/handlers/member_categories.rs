//! # Member Category Handlers

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::member_category::{MemberCategory, MemberCategoryUpdate, NewMemberCategory};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_contribution_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_contribution_amount: Option<f64>,
}

/// `POST /api/member-categories` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateMemberCategoryRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require_str("name", payload.name.as_deref(), "Le nom de la catégorie est requis.")
        .require(
            "monthlyContributionAmount",
            payload.monthly_contribution_amount.is_some(),
            "Le montant de la contribution mensuelle doit être un nombre positif.",
        )
        .positive(
            "monthlyContributionAmount",
            payload.monthly_contribution_amount,
            "Le montant de la contribution mensuelle doit être un nombre positif.",
        )
        .check()?;

    let name = payload.name.unwrap_or_default();
    if MemberCategory::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(ApiError::conflict("Une catégorie avec ce nom existe déjà."));
    }

    let category = MemberCategory::create(
        &state.pool,
        NewMemberCategory {
            name,
            description: payload.description,
            monthly_contribution_amount: payload.monthly_contribution_amount.unwrap_or_default(),
        },
    )
    .await?;

    Ok(responses::created(
        "Catégorie de membre créée avec succès.",
        "memberCategory",
        &category,
    ))
}

/// `GET /api/member-categories`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let categories = MemberCategory::list(&state.pool).await?;
    Ok(Json(categories).into_response())
}

/// `GET /api/member-categories/:id`
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let category = MemberCategory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Catégorie de membre introuvable."))?;
    Ok(Json(category).into_response())
}

/// `PUT /api/member-categories/:id` (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMemberCategoryRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .positive(
            "monthlyContributionAmount",
            payload.monthly_contribution_amount,
            "Le montant de la contribution mensuelle doit être un nombre positif.",
        )
        .check()?;

    if MemberCategory::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Catégorie de membre introuvable."));
    }

    if let Some(name) = &payload.name {
        if let Some(existing) = MemberCategory::find_by_name(&state.pool, name).await? {
            if existing.id != id {
                return Err(ApiError::conflict("Une catégorie avec ce nom existe déjà."));
            }
        }
    }

    let category = MemberCategory::update(
        &state.pool,
        id,
        MemberCategoryUpdate {
            name: payload.name,
            description: payload.description,
            monthly_contribution_amount: payload.monthly_contribution_amount,
        },
    )
    .await?;

    Ok(responses::updated(
        "Catégorie de membre mise à jour avec succès.",
        "memberCategory",
        &category,
    ))
}

/// `DELETE /api/member-categories/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if !MemberCategory::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Catégorie de membre introuvable."));
    }
    Ok(responses::deleted("Catégorie de membre supprimée avec succès."))
}
