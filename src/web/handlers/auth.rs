//! # Authentication Handlers
//!
//! Registration, login and password change. Passwords are hashed with
//! bcrypt; successful register/login answers carry a fresh session token.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::models::user::{NewUser, User};
use crate::web::auth::CurrentUser;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;
use crate::web::validation::Validator;

pub(crate) const BCRYPT_COST: u32 = 10;

const DUPLICATE_EMAIL: &str = "Cet email est déjà utilisé.";
// One message for both unknown email and wrong password.
const BAD_CREDENTIALS: &str = "Email ou mot de passe incorrect.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require_str("name", payload.name.as_deref(), "Le nom est requis.")
        .require_str("email", payload.email.as_deref(), "L'email est requis.")
        .email("email", payload.email.as_deref(), "L'email doit être valide.")
        .require_str(
            "password",
            payload.password.as_deref(),
            "Le mot de passe est requis.",
        )
        .min_len(
            "password",
            payload.password.as_deref(),
            6,
            "Le mot de passe doit avoir au moins 6 caractères.",
        )
        .check()?;

    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if User::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::conflict(DUPLICATE_EMAIL));
    }

    let password_hash = bcrypt::hash(&password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    let user = User::create(
        &state.pool,
        NewUser {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    let token = state
        .authenticator
        .generate_token(user.id, &user.email, user.is_admin)
        .map_err(|e| anyhow::anyhow!(e))?;

    info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Utilisateur enregistré avec succès",
            "token": token,
            "user": user,
        })),
    )
        .into_response())
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require_str("email", payload.email.as_deref(), "L'email est requis.")
        .require_str(
            "password",
            payload.password.as_deref(),
            "Le mot de passe est requis.",
        )
        .check()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = User::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;

    let valid = bcrypt::verify(&password, &user.password_hash)
        .map_err(|e| anyhow::anyhow!("password verification failed: {e}"))?;
    if !valid {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    if !user.is_active {
        return Err(ApiError::forbidden(
            "Votre compte est désactivé. Veuillez contacter l'administrateur.",
        ));
    }

    let token = state
        .authenticator
        .generate_token(user.id, &user.email, user.is_admin)
        .map_err(|e| anyhow::anyhow!(e))?;

    info!(user_id = user.id, "user logged in");

    Ok(Json(json!({
        "message": "Connexion réussie",
        "token": token,
        "user": user,
    }))
    .into_response())
}

/// `PUT /api/auth/change-password` (protected)
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require_str(
            "oldPassword",
            payload.old_password.as_deref(),
            "L'ancien mot de passe est requis.",
        )
        .require_str(
            "newPassword",
            payload.new_password.as_deref(),
            "Le nouveau mot de passe est requis.",
        )
        .min_len(
            "newPassword",
            payload.new_password.as_deref(),
            6,
            "Le mot de passe doit avoir au moins 6 caractères.",
        )
        .check()?;

    let user = User::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Non autorisé, utilisateur non identifié."))?;

    let old_password = payload.old_password.unwrap_or_default();
    let valid = bcrypt::verify(&old_password, &user.password_hash)
        .map_err(|e| anyhow::anyhow!("password verification failed: {e}"))?;
    if !valid {
        return Err(ApiError::unauthorized("Ancien mot de passe incorrect."));
    }

    let new_password = payload.new_password.unwrap_or_default();
    let password_hash = bcrypt::hash(&new_password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    User::set_password_hash(&state.pool, user.id, &password_hash).await?;

    Ok(Json(json!({ "message": "Mot de passe mis à jour avec succès." })).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_is_a_conflict() {
        let (status, message) = ApiError::conflict(DUPLICATE_EMAIL).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Cet email est déjà utilisé.");
    }

    #[test]
    fn test_unknown_email_and_wrong_password_share_one_message() {
        let unknown_email = ApiError::unauthorized(BAD_CREDENTIALS).status_and_message();
        let wrong_password = ApiError::unauthorized(BAD_CREDENTIALS).status_and_message();
        assert_eq!(unknown_email, wrong_password);
        assert_eq!(unknown_email.0, StatusCode::UNAUTHORIZED);
    }
}
