//! # Event Handlers
//!
//! Any member may create events; private events are only visible to
//! admins, the creator and the concerned user.

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::event::{Event, EventUpdate, NewEvent};
use crate::models::{EventType, User};
use crate::web::auth::CurrentUser;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type_id: Option<i64>,
    pub concerned_user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub contribution_required: Option<bool>,
    pub is_private: Option<bool>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type_id: Option<i64>,
    pub concerned_user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub contribution_required: Option<bool>,
    pub is_private: Option<bool>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
}

fn can_view(event: &Event, current_user: &CurrentUser) -> bool {
    !event.is_private
        || current_user.is_admin
        || event.created_by_id == current_user.id
        || event.concerned_user_id == Some(current_user.id)
}

fn can_manage(event: &Event, current_user: &CurrentUser) -> bool {
    current_user.is_admin || event.created_by_id == current_user.id
}

/// `POST /api/events` (any member; the caller becomes the creator)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require_str("title", payload.title.as_deref(), "Le titre de l'événement est requis.")
        .require(
            "eventTypeId",
            payload.event_type_id.is_some(),
            "Le type d'événement est requis.",
        )
        .require(
            "startDate",
            payload.start_date.is_some(),
            "La date de début de l'événement est requise.",
        )
        .check()?;

    let event_type_id = payload.event_type_id.unwrap_or_default();
    if EventType::find_by_id(&state.pool, event_type_id).await?.is_none() {
        return Err(ApiError::not_found("Type d'événement introuvable."));
    }

    if let Some(concerned_user_id) = payload.concerned_user_id {
        if !User::exists(&state.pool, concerned_user_id).await? {
            return Err(ApiError::not_found("Utilisateur concerné introuvable."));
        }
    }

    let event = Event::create(
        &state.pool,
        NewEvent {
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            location: payload.location,
            event_type_id,
            created_by_id: current_user.id,
            concerned_user_id: payload.concerned_user_id,
            start_date: payload.start_date.unwrap_or_else(Utc::now),
            end_date: payload.end_date,
            is_active: payload.is_active.unwrap_or(true),
            contribution_required: payload.contribution_required.unwrap_or(true),
            is_private: payload.is_private.unwrap_or(false),
            is_recurring: payload.is_recurring.unwrap_or(false),
            recurrence_pattern: payload.recurrence_pattern,
        },
    )
    .await?;

    Ok(responses::created("Événement créé avec succès.", "event", &event))
}

/// `GET /api/events`. Admins see everything; members see public events
/// plus their own and those concerning them.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let events = if current_user.is_admin {
        Event::list_all(&state.pool).await?
    } else {
        Event::list_visible_to(&state.pool, current_user.id).await?
    };
    Ok(Json(events).into_response())
}

/// `GET /api/events/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let event = Event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Événement introuvable."))?;

    if !can_view(&event, &current_user) {
        return Err(ApiError::forbidden("Accès non autorisé à cet événement privé."));
    }
    Ok(Json(event).into_response())
}

/// `PUT /api/events/:id` (admin or creator)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Response> {
    let event = Event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Événement introuvable."))?;

    if !can_manage(&event, &current_user) {
        return Err(ApiError::forbidden("Accès non autorisé pour modifier cet événement."));
    }

    if let Some(event_type_id) = payload.event_type_id {
        if EventType::find_by_id(&state.pool, event_type_id).await?.is_none() {
            return Err(ApiError::not_found("Nouveau type d'événement introuvable."));
        }
    }
    if let Some(concerned_user_id) = payload.concerned_user_id {
        if !User::exists(&state.pool, concerned_user_id).await? {
            return Err(ApiError::not_found("Nouvel utilisateur concerné introuvable."));
        }
    }

    let updated = Event::update(
        &state.pool,
        id,
        EventUpdate {
            title: payload.title,
            description: payload.description,
            location: payload.location,
            event_type_id: payload.event_type_id,
            concerned_user_id: payload.concerned_user_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            is_active: payload.is_active,
            contribution_required: payload.contribution_required,
            is_private: payload.is_private,
            is_recurring: payload.is_recurring,
            recurrence_pattern: payload.recurrence_pattern,
        },
    )
    .await?;

    Ok(responses::updated("Événement mis à jour avec succès.", "event", &updated))
}

/// `DELETE /api/events/:id` (admin or creator)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let event = Event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Événement introuvable."))?;

    if !can_manage(&event, &current_user) {
        return Err(ApiError::forbidden("Accès non autorisé pour supprimer cet événement."));
    }

    Event::delete(&state.pool, id).await?;
    Ok(responses::deleted("Événement supprimé avec succès."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(is_private: bool, created_by: i64, concerned: Option<i64>) -> Event {
        Event {
            id: 1,
            title: "Mariage".to_string(),
            description: None,
            location: None,
            event_type_id: 1,
            created_by_id: created_by,
            concerned_user_id: concerned,
            start_date: Utc::now(),
            end_date: None,
            is_active: true,
            contribution_required: true,
            is_private,
            is_recurring: false,
            recurrence_pattern: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const ADMIN: CurrentUser = CurrentUser { id: 1, is_admin: true };
    const MEMBER: CurrentUser = CurrentUser { id: 2, is_admin: false };

    #[test]
    fn test_private_event_visibility() {
        let private = event(true, 3, Some(4));
        assert!(can_view(&private, &ADMIN));
        assert!(!can_view(&private, &MEMBER));
        assert!(can_view(&private, &CurrentUser { id: 3, is_admin: false }));
        assert!(can_view(&private, &CurrentUser { id: 4, is_admin: false }));

        let public = event(false, 3, None);
        assert!(can_view(&public, &MEMBER));
    }

    #[test]
    fn test_only_admin_or_creator_manages() {
        let e = event(false, 2, None);
        assert!(can_manage(&e, &ADMIN));
        assert!(can_manage(&e, &MEMBER));
        assert!(!can_manage(&e, &CurrentUser { id: 5, is_admin: false }));
    }
}
