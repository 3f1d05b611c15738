//! # Meeting Attendance Handlers
//!
//! Composite-key resource addressed by `(meetingId, userId)`. Members
//! manage their own attendance; deletion is an admin action.

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::meeting_attendance::{
    MeetingAttendance, MeetingAttendanceUpdate, NewMeetingAttendance,
};
use crate::models::{FamilyMeeting, User};
use crate::web::auth::CurrentUser;
use crate::web::authz::{require_admin, require_admin_or_owner};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceRequest {
    pub user_id: Option<i64>,
    pub meeting_id: Option<i64>,
    pub attendance_status: Option<String>,
    pub excuse_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub attendance_status: Option<String>,
    pub excuse_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListParams {
    pub meeting_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

/// `POST /api/meeting-attendances` (admin or the member themselves)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateAttendanceRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require("userId", payload.user_id.is_some(), "L'ID de l'utilisateur est requis.")
        .require("meetingId", payload.meeting_id.is_some(), "L'ID de la réunion est requis.")
        .check()?;

    let user_id = payload.user_id.unwrap_or_default();
    let meeting_id = payload.meeting_id.unwrap_or_default();

    require_admin_or_owner(
        &current_user,
        user_id,
        "Non autorisé à enregistrer la présence pour un autre utilisateur.",
    )?;

    if !FamilyMeeting::exists(&state.pool, meeting_id).await? {
        return Err(ApiError::not_found("Réunion introuvable."));
    }
    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found("Utilisateur introuvable."));
    }
    if MeetingAttendance::find(&state.pool, meeting_id, user_id).await?.is_some() {
        return Err(ApiError::conflict(
            "Cet utilisateur a déjà une entrée d'assiduité pour cette réunion. Veuillez la \
             mettre à jour.",
        ));
    }

    let attendance = MeetingAttendance::create(
        &state.pool,
        NewMeetingAttendance {
            user_id,
            meeting_id,
            attendance_status: payload.attendance_status,
            excuse_reason: payload.excuse_reason,
        },
    )
    .await?;

    Ok(responses::created(
        "Assiduité à la réunion enregistrée avec succès.",
        "attendance",
        &attendance,
    ))
}

/// `GET /api/meeting-attendances`. Admins filter by
/// `meetingId`/`userId`/`status`; members are scoped to themselves.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<AttendanceListParams>,
) -> ApiResult<Response> {
    let user_filter = if current_user.is_admin {
        params.user_id
    } else {
        Some(current_user.id)
    };

    let attendances =
        MeetingAttendance::list(&state.pool, params.meeting_id, user_filter, params.status)
            .await?;
    Ok(Json(attendances).into_response())
}

/// `GET /api/meeting-attendances/:meetingId/:userId`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((meeting_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    let attendance = MeetingAttendance::find(&state.pool, meeting_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Entrée d'assiduité introuvable."))?;

    require_admin_or_owner(
        &current_user,
        attendance.user_id,
        "Accès non autorisé à cette entrée d'assiduité.",
    )?;
    Ok(Json(attendance).into_response())
}

/// `PUT /api/meeting-attendances/:meetingId/:userId`
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((meeting_id, user_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateAttendanceRequest>,
) -> ApiResult<Response> {
    let attendance = MeetingAttendance::find(&state.pool, meeting_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Entrée d'assiduité introuvable."))?;

    require_admin_or_owner(
        &current_user,
        attendance.user_id,
        "Non autorisé à modifier cette entrée d'assiduité.",
    )?;

    let updated = MeetingAttendance::update(
        &state.pool,
        meeting_id,
        user_id,
        MeetingAttendanceUpdate {
            attendance_status: payload.attendance_status,
            excuse_reason: payload.excuse_reason,
        },
    )
    .await?;

    Ok(responses::updated(
        "Assiduité à la réunion mise à jour avec succès.",
        "attendance",
        &updated,
    ))
}

/// `DELETE /api/meeting-attendances/:meetingId/:userId` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((meeting_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à supprimer les entrées d'assiduité.")?;

    if !MeetingAttendance::delete(&state.pool, meeting_id, user_id).await? {
        return Err(ApiError::not_found("Entrée d'assiduité introuvable."));
    }
    Ok(responses::deleted("Assiduité à la réunion supprimée avec succès."))
}
