//! # Event Contribution Handlers
//!
//! The (event, user) pair is fixed at creation; updates only touch
//! payment details.

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::event_contribution::{
    EventContribution, EventContributionUpdate, NewEventContribution,
};
use crate::models::{Event, User};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin_or_owner;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventContributionRequest {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventContributionRequest {
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContributionListParams {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// `POST /api/event-contributions` (admin or the contributing member)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateEventContributionRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require("eventId", payload.event_id.is_some(), "L'ID de l'événement est requis.")
        .require("userId", payload.user_id.is_some(), "L'ID de l'utilisateur est requis.")
        .require("amount", payload.amount.is_some(), "Le montant est requis.")
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .require(
            "paymentDate",
            payload.payment_date.is_some(),
            "La date de paiement est requise.",
        )
        .check()?;

    let user_id = payload.user_id.unwrap_or_default();
    require_admin_or_owner(
        &current_user,
        user_id,
        "Non autorisé à créer une contribution pour un autre utilisateur.",
    )?;

    let event_id = payload.event_id.unwrap_or_default();
    if !Event::exists(&state.pool, event_id).await? {
        return Err(ApiError::not_found("L'événement spécifié n'existe pas."));
    }
    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found(
            "Utilisateur cible introuvable pour la contribution.",
        ));
    }

    let contribution = EventContribution::create(
        &state.pool,
        NewEventContribution {
            event_id,
            user_id,
            amount: payload.amount.unwrap_or_default(),
            payment_date: payload.payment_date.unwrap_or_else(Utc::now),
            payment_method: payload.payment_method,
            transaction_reference: payload.transaction_reference,
            notes: payload.notes,
        },
    )
    .await?;

    Ok(responses::created(
        "Contribution d'événement créée avec succès.",
        "contribution",
        &contribution,
    ))
}

/// `GET /api/event-contributions`. Admins filter by `eventId`/`userId`;
/// members are scoped to their own records.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<EventContributionListParams>,
) -> ApiResult<Response> {
    let user_filter = if current_user.is_admin {
        params.user_id
    } else {
        Some(current_user.id)
    };

    let contributions = EventContribution::list(&state.pool, params.event_id, user_filter).await?;
    Ok(Json(contributions).into_response())
}

/// `GET /api/event-contributions/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let contribution = EventContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution d'événement introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à cette contribution.",
    )?;
    Ok(Json(contribution).into_response())
}

/// `PUT /api/event-contributions/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventContributionRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .check()?;

    let contribution = EventContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution d'événement introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à la modification de cette contribution.",
    )?;

    let updated = EventContribution::update(
        &state.pool,
        id,
        EventContributionUpdate {
            amount: payload.amount,
            payment_date: payload.payment_date,
            payment_method: payload.payment_method,
            transaction_reference: payload.transaction_reference,
            notes: payload.notes,
        },
    )
    .await?;

    Ok(responses::updated(
        "Contribution d'événement mise à jour avec succès.",
        "contribution",
        &updated,
    ))
}

/// `DELETE /api/event-contributions/:id`
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let contribution = EventContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution d'événement introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à la suppression de cette contribution.",
    )?;

    EventContribution::delete(&state.pool, id).await?;
    Ok(responses::deleted("Contribution d'événement supprimée avec succès."))
}
