//! # Sanction Handlers
//!
//! Admins issue and resolve sanctions; members can read their own.

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::sanction::{NewSanction, Sanction, SanctionUpdate};
use crate::models::User;
use crate::web::auth::CurrentUser;
use crate::web::authz::{require_admin, require_admin_or_owner};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSanctionRequest {
    pub user_id: Option<i64>,
    pub reason: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSanctionRequest {
    pub reason: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by_id: Option<i64>,
    pub resolution_notes: Option<String>,
}

/// `POST /api/sanctions` (admin; `createdById` must itself be an admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateSanctionRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Accès non autorisé. Réservé aux administrateurs.")?;

    Validator::new()
        .require(
            "userId",
            payload.user_id.is_some(),
            "L'ID de l'utilisateur sanctionné est requis.",
        )
        .require_str("reason", payload.reason.as_deref(), "La raison de la sanction est requise.")
        .require(
            "startDate",
            payload.start_date.is_some(),
            "La date de début de la sanction est requise.",
        )
        .require(
            "createdById",
            payload.created_by_id.is_some(),
            "L'ID de l'administrateur créateur est requis.",
        )
        .check()?;

    let user_id = payload.user_id.unwrap_or_default();
    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found("Utilisateur sanctionné introuvable."));
    }

    let created_by_id = payload.created_by_id.unwrap_or_default();
    let creator = User::find_by_id(&state.pool, created_by_id).await?;
    if !creator.is_some_and(|u| u.is_admin) {
        return Err(ApiError::bad_request(
            "Seul un administrateur peut créer des sanctions, et createdById doit être un ID \
             d'administrateur valide.",
        ));
    }

    let sanction = Sanction::create(
        &state.pool,
        NewSanction {
            user_id,
            reason: payload.reason.unwrap_or_default(),
            start_date: payload.start_date.unwrap_or_else(Utc::now),
            end_date: payload.end_date,
            created_by_id,
        },
    )
    .await?;

    Ok(responses::created("Sanction créée avec succès.", "sanction", &sanction))
}

/// `GET /api/sanctions`. Admins filter by `userId`/`resolved`; members
/// only see their own.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let resolved = match params.get("resolved").map(String::as_str) {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => {
            return Err(ApiError::bad_request(
                "Le filtre resolved doit être un booléen (true/false)",
            ))
        }
    };

    let user_filter = if current_user.is_admin {
        params.get("userId").and_then(|raw| raw.parse::<i64>().ok())
    } else {
        Some(current_user.id)
    };

    let sanctions = Sanction::list(&state.pool, user_filter, resolved).await?;
    Ok(Json(sanctions).into_response())
}

/// `GET /api/sanctions/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let sanction = Sanction::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sanction introuvable."))?;

    require_admin_or_owner(
        &current_user,
        sanction.user_id,
        "Accès non autorisé à cette sanction.",
    )?;
    Ok(Json(sanction).into_response())
}

/// `PUT /api/sanctions/:id` (admin; may record a resolution)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSanctionRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à modifier les sanctions.")?;

    if Sanction::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Sanction introuvable."));
    }

    if let Some(resolved_by_id) = payload.resolved_by_id {
        if !User::exists(&state.pool, resolved_by_id).await? {
            return Err(ApiError::not_found("Utilisateur introuvable."));
        }
    }

    let sanction = Sanction::update(
        &state.pool,
        id,
        SanctionUpdate {
            reason: payload.reason,
            start_date: payload.start_date,
            end_date: payload.end_date,
            resolved_at: payload.resolved_at,
            resolved_by_id: payload.resolved_by_id,
            resolution_notes: payload.resolution_notes,
        },
    )
    .await?;

    Ok(responses::updated("Sanction mise à jour avec succès.", "sanction", &sanction))
}

/// `DELETE /api/sanctions/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à supprimer les sanctions.")?;

    if !Sanction::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Sanction introuvable."));
    }
    Ok(responses::deleted("Sanction supprimée avec succès."))
}
