//! # Event Type Handlers

use axum::extract::{Extension, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::models::event_type::{EventType, EventTypeUpdate, NewEventType};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_happy_event: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_happy_event: Option<bool>,
}

/// `POST /api/event-types` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateEventTypeRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require_str("name", payload.name.as_deref(), "Le nom du type d'événement est requis.")
        .check()?;

    let name = payload.name.unwrap_or_default();
    if EventType::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(ApiError::conflict("Un type d'événement avec ce nom existe déjà."));
    }

    let event_type = EventType::create(
        &state.pool,
        NewEventType {
            name,
            description: payload.description,
            is_happy_event: payload.is_happy_event.unwrap_or(true),
        },
    )
    .await?;

    Ok(responses::created(
        "Type d'événement créé avec succès.",
        "eventType",
        &event_type,
    ))
}

/// `GET /api/event-types`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let event_types = EventType::list(&state.pool).await?;
    Ok(Json(event_types).into_response())
}

/// `GET /api/event-types/:id`
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let event_type = EventType::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Type d'événement introuvable."))?;
    Ok(Json(event_type).into_response())
}

/// `PUT /api/event-types/:id` (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventTypeRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if EventType::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Type d'événement introuvable."));
    }

    if let Some(name) = &payload.name {
        if let Some(existing) = EventType::find_by_name(&state.pool, name).await? {
            if existing.id != id {
                return Err(ApiError::conflict("Un type d'événement avec ce nom existe déjà."));
            }
        }
    }

    let event_type = EventType::update(
        &state.pool,
        id,
        EventTypeUpdate {
            name: payload.name,
            description: payload.description,
            is_happy_event: payload.is_happy_event,
        },
    )
    .await?;

    Ok(responses::updated(
        "Type d'événement mis à jour avec succès.",
        "eventType",
        &event_type,
    ))
}

/// `DELETE /api/event-types/:id` (admin). Refused while events still
/// reference the type.
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    match EventType::delete(&state.pool, id).await {
        Ok(true) => {
            Ok(responses::deleted("Type d'événement supprimé avec succès."))
        }
        Ok(false) => Err(ApiError::not_found("Type d'événement introuvable.")),
        Err(e) if is_foreign_key_violation(&e) => Err(ApiError::bad_request(
            "Impossible de supprimer ce type d'événement car des événements y sont liés. \
             Veuillez d'abord supprimer ou modifier ces événements.",
        )),
        Err(e) => Err(e.into()),
    }
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23503")
}
