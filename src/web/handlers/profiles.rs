//! # Profile Handlers

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::profile::{NewProfile, Profile, ProfileUpdate};
use crate::models::User;
use crate::web::auth::CurrentUser;
use crate::web::authz::{require_admin, require_admin_or_owner};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub user_id: Option<i64>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_path: Option<String>,
    #[serde(default)]
    pub is_married: bool,
    #[serde(default)]
    pub is_employed: bool,
    #[serde(default)]
    pub is_civil_servant: bool,
    pub parent_id: Option<i64>,
}

/// Partial update. `parentId` distinguishes absent (unchanged) from
/// explicit `null` (cleared).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_path: Option<String>,
    pub is_married: Option<bool>,
    pub is_employed: Option<bool>,
    pub is_civil_servant: Option<bool>,
    #[serde(default, with = "serde_double_option")]
    pub parent_id: Option<Option<i64>>,
}

/// `POST /api/profiles` (admin or the target user)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateProfileRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require("userId", payload.user_id.is_some(), "L'ID de l'utilisateur est requis.")
        .check()?;
    let user_id = payload.user_id.unwrap_or_default();

    require_admin_or_owner(
        &current_user,
        user_id,
        "Non autorisé à créer un profil pour un autre utilisateur.",
    )?;

    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found(
            "Utilisateur cible introuvable pour la création du profil.",
        ));
    }

    if Profile::find_by_user_id(&state.pool, user_id).await?.is_some() {
        return Err(ApiError::conflict(
            "Un profil existe déjà pour cet utilisateur. Utilisez la mise à jour.",
        ));
    }

    if let Some(parent_id) = payload.parent_id {
        if !User::exists(&state.pool, parent_id).await? {
            return Err(ApiError::not_found("Parent spécifié introuvable."));
        }
    }

    let profile = Profile::create(
        &state.pool,
        NewProfile {
            user_id,
            phone_number: payload.phone_number,
            address: payload.address,
            date_of_birth: payload.date_of_birth,
            profile_photo_path: payload.profile_photo_path,
            is_married: payload.is_married,
            is_employed: payload.is_employed,
            is_civil_servant: payload.is_civil_servant,
            parent_id: payload.parent_id,
        },
    )
    .await?;

    Ok(responses::created("Profil créé avec succès.", "profile", &profile))
}

/// `GET /api/profiles` (admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let profiles = Profile::list(&state.pool).await?;
    Ok(Json(profiles).into_response())
}

/// `GET /api/profiles/:id` (admin or owner)
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let profile = Profile::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profil introuvable."))?;

    require_admin_or_owner(&current_user, profile.user_id, "Accès non autorisé à ce profil.")?;
    Ok(Json(profile).into_response())
}

/// `PUT /api/profiles/:id` (admin or owner)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Response> {
    let profile = Profile::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profil introuvable."))?;

    require_admin_or_owner(
        &current_user,
        profile.user_id,
        "Accès non autorisé à la modification de ce profil.",
    )?;

    if let Some(Some(parent_id)) = payload.parent_id {
        if !User::exists(&state.pool, parent_id).await? {
            return Err(ApiError::not_found("Nouveau parent spécifié introuvable."));
        }
    }

    let updated = Profile::update(
        &state.pool,
        id,
        ProfileUpdate {
            phone_number: payload.phone_number,
            address: payload.address,
            date_of_birth: payload.date_of_birth,
            profile_photo_path: payload.profile_photo_path,
            is_married: payload.is_married,
            is_employed: payload.is_employed,
            is_civil_servant: payload.is_civil_servant,
            parent_id: payload.parent_id,
        },
    )
    .await?;

    Ok(responses::updated("Profil mis à jour avec succès.", "profile", &updated))
}

/// `DELETE /api/profiles/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(
        &current_user,
        "Accès non autorisé à la suppression de ce profil.",
    )?;

    if !Profile::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Profil introuvable."));
    }
    Ok(responses::deleted("Profil supprimé avec succès."))
}

/// Double-option deserializer: a missing key stays `None`, an explicit
/// `null` becomes `Some(None)`.
mod serde_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(Some)
    }
}
