//! # Family Meeting Handlers

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::family_meeting::{FamilyMeeting, FamilyMeetingUpdate, NewFamilyMeeting};
use crate::models::User;
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyMeetingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_by_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFamilyMeetingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMeetingListParams {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

/// `POST /api/family-meetings` (admin; `createdById` must be an admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateFamilyMeetingRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Accès non autorisé. Réservé aux administrateurs.")?;

    Validator::new()
        .require_str("title", payload.title.as_deref(), "Le titre de la réunion est requis.")
        .require(
            "meetingDate",
            payload.meeting_date.is_some(),
            "La date de la réunion est requise.",
        )
        .require(
            "createdById",
            payload.created_by_id.is_some(),
            "L'ID de l'administrateur créateur est requis.",
        )
        .check()?;

    let created_by_id = payload.created_by_id.unwrap_or_default();
    let creator = User::find_by_id(&state.pool, created_by_id).await?;
    if !creator.is_some_and(|u| u.is_admin) {
        return Err(ApiError::bad_request(
            "Seul un administrateur peut créer des réunions, et createdById doit être un ID \
             d'administrateur valide.",
        ));
    }

    let meeting = FamilyMeeting::create(
        &state.pool,
        NewFamilyMeeting {
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            meeting_date: payload.meeting_date.unwrap_or_else(Utc::now),
            location: payload.location,
            start_time: payload.start_time,
            end_time: payload.end_time,
            created_by_id,
        },
    )
    .await?;

    Ok(responses::created(
        "Réunion familiale créée avec succès.",
        "meeting",
        &meeting,
    ))
}

/// `GET /api/family-meetings` with an optional `fromDate`/`toDate` range.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<FamilyMeetingListParams>,
) -> ApiResult<Response> {
    let meetings = FamilyMeeting::list(&state.pool, params.from_date, params.to_date).await?;
    Ok(Json(meetings).into_response())
}

/// `GET /api/family-meetings/:id`
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let meeting = FamilyMeeting::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Réunion familiale introuvable."))?;
    Ok(Json(meeting).into_response())
}

/// `PUT /api/family-meetings/:id` (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFamilyMeetingRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à modifier les réunions familiales.")?;

    if FamilyMeeting::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Réunion familiale introuvable."));
    }

    let meeting = FamilyMeeting::update(
        &state.pool,
        id,
        FamilyMeetingUpdate {
            title: payload.title,
            description: payload.description,
            meeting_date: payload.meeting_date,
            location: payload.location,
            start_time: payload.start_time,
            end_time: payload.end_time,
        },
    )
    .await?;

    Ok(responses::updated(
        "Réunion familiale mise à jour avec succès.",
        "meeting",
        &meeting,
    ))
}

/// `DELETE /api/family-meetings/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à supprimer les réunions familiales.")?;

    if !FamilyMeeting::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Réunion familiale introuvable."));
    }
    Ok(responses::deleted("Réunion familiale supprimée avec succès."))
}
