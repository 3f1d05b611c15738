//! # User Handlers
//!
//! Own-profile lookup for any member; full user administration for admins.

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::user::{User, UserUpdate};
use crate::models::Profile;
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// `GET /api/users/profile`: the caller's own account with its profile
/// record attached.
pub async fn own_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let user = User::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profil utilisateur introuvable."))?;
    let profile = Profile::find_by_user_id(&state.pool, current_user.id).await?;

    let mut body = serde_json::to_value(&user).map_err(anyhow::Error::from)?;
    body["profile"] = serde_json::to_value(&profile).map_err(anyhow::Error::from)?;
    Ok(Json(body).into_response())
}

/// `GET /api/users` (admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let users = User::list(&state.pool).await?;
    Ok(Json(users).into_response())
}

/// `GET /api/users/:id` (admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let user = User::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Utilisateur introuvable."))?;
    Ok(Json(user).into_response())
}

/// `PUT /api/users/:id` (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .email("email", payload.email.as_deref(), "L'email doit être valide.")
        .min_len(
            "password",
            payload.password.as_deref(),
            6,
            "Le mot de passe doit avoir au moins 6 caractères.",
        )
        .check()?;

    if !User::exists(&state.pool, id).await? {
        return Err(ApiError::not_found("Utilisateur introuvable."));
    }

    let password_hash = match payload.password {
        Some(password) => Some(
            bcrypt::hash(&password, super::auth::BCRYPT_COST)
                .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?,
        ),
        None => None,
    };

    let user = User::update(
        &state.pool,
        id,
        UserUpdate {
            name: payload.name,
            email: payload.email,
            is_admin: payload.is_admin,
            is_active: payload.is_active,
            password_hash,
        },
    )
    .await?;

    Ok(responses::updated(
        "Utilisateur mis à jour avec succès.",
        "user",
        &user,
    ))
}

/// `DELETE /api/users/:id` (admin; self-deletion refused)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if id == current_user.id {
        return Err(ApiError::forbidden(
            "Un administrateur ne peut pas supprimer son propre compte via cette route.",
        ));
    }

    if !User::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Utilisateur introuvable."));
    }
    Ok(responses::deleted("Utilisateur supprimé avec succès."))
}
