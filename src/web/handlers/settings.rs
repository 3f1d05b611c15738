//! # Setting Handlers
//!
//! Admin-only key/value settings store, addressed by key.

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::setting::{NewSetting, Setting, SettingUpdate};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingRequest {
    pub key: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    pub value: Option<String>,
    pub description: Option<String>,
}

/// `POST /api/settings` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateSettingRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require_str("key", payload.key.as_deref(), "La clé du paramètre est requise.")
        .require_str("value", payload.value.as_deref(), "La valeur du paramètre est requise.")
        .check()?;

    let key = payload.key.unwrap_or_default();
    if Setting::find_by_key(&state.pool, &key).await?.is_some() {
        return Err(ApiError::conflict("Un paramètre avec cette clé existe déjà."));
    }

    let setting = Setting::create(
        &state.pool,
        NewSetting {
            key,
            value: payload.value.unwrap_or_default(),
            description: payload.description,
        },
    )
    .await?;

    Ok(responses::created("Paramètre créé avec succès.", "setting", &setting))
}

/// `GET /api/settings` (admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let settings = Setting::list(&state.pool).await?;
    Ok(Json(settings).into_response())
}

/// `GET /api/settings/:key` (admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let setting = Setting::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| ApiError::not_found("Paramètre introuvable."))?;
    Ok(Json(setting).into_response())
}

/// `PUT /api/settings/:key` (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if Setting::find_by_key(&state.pool, &key).await?.is_none() {
        return Err(ApiError::not_found("Paramètre introuvable."));
    }

    let setting = Setting::update(
        &state.pool,
        &key,
        SettingUpdate {
            value: payload.value,
            description: payload.description,
        },
    )
    .await?;

    Ok(responses::updated("Paramètre mis à jour avec succès.", "setting", &setting))
}

/// `DELETE /api/settings/:key` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if !Setting::delete(&state.pool, &key).await? {
        return Err(ApiError::not_found("Paramètre introuvable."));
    }
    Ok(responses::deleted("Paramètre supprimé avec succès."))
}
