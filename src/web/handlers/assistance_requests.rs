//! # Assistance Request Handlers
//!
//! The one list endpoint driven by the full query builder: equality
//! filters, text search, allow-listed sort and pagination, with non-admin
//! callers scoped to their own requests.

use std::collections::HashMap;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use sqlx::QueryBuilder;

use crate::models::assistance_request::{
    AssistanceRequest, AssistanceRequestUpdate, NewAssistanceRequest,
};
use crate::models::Event;
use crate::query_builder::{ApiFeatures, Condition, FilterValue, SortDirection};
use crate::web::auth::CurrentUser;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const SEARCHABLE: &[&str] = &["title", "description", "status"];
const SORTABLE: &[&str] = &[
    "id",
    "userId",
    "eventId",
    "title",
    "status",
    "amountRequested",
    "createdAt",
    "updatedAt",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistanceRequestRequest {
    pub event_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount_requested: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssistanceRequestRequest {
    pub event_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount_requested: Option<f64>,
    pub status: Option<String>,
}

/// `POST /api/assistance-requests`. The caller is always the requester.
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateAssistanceRequestRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .require_str("title", payload.title.as_deref(), "Le titre de la demande est requis.")
        .require(
            "amountRequested",
            payload.amount_requested.is_some(),
            "Le montant demandé est requis.",
        )
        .positive(
            "amountRequested",
            payload.amount_requested,
            "Le montant demandé doit être un nombre positif.",
        )
        .check()?;

    if let Some(event_id) = payload.event_id {
        if !Event::exists(&state.pool, event_id).await? {
            return Err(ApiError::not_found("L'événement spécifié n'existe pas."));
        }
    }

    let request = AssistanceRequest::create(
        &state.pool,
        NewAssistanceRequest {
            user_id: current_user.id,
            event_id: payload.event_id,
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            amount_requested: payload.amount_requested.unwrap_or_default(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(request)).into_response())
}

/// `GET /api/assistance-requests`, a builder-driven list with the
/// `{ status, total, results, data }` envelope.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let mut query = ApiFeatures::new(params, state.config.pagination.default_limit)
        .filter()
        .search(SEARCHABLE)
        .sort(SORTABLE)
        .paginate()
        .build();

    if query.order_by.is_none() {
        query.order_by = Some(("created_at".to_string(), SortDirection::Desc));
    }

    if !current_user.is_admin {
        query = query.and_where(Condition::Eq {
            column: "user_id".to_string(),
            value: FilterValue::Int(current_user.id),
        });
    }

    let mut count_builder = QueryBuilder::new(format!(
        "SELECT COUNT(*) FROM {}",
        AssistanceRequest::TABLE
    ));
    query.push_where(&mut count_builder);
    let (total,): (i64,) = count_builder
        .build_query_as()
        .fetch_one(&state.pool)
        .await?;

    let mut select_builder = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        AssistanceRequest::COLUMNS,
        AssistanceRequest::TABLE
    ));
    query.apply(&mut select_builder);
    let data: Vec<AssistanceRequest> = select_builder
        .build_query_as()
        .fetch_all(&state.pool)
        .await?;

    Ok(responses::list(total, &data))
}

/// `GET /api/assistance-requests/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let request = AssistanceRequest::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demande d'assistance introuvable."))?;

    if !current_user.is_admin && request.user_id != current_user.id {
        return Err(ApiError::forbidden(
            "Non autorisé à accéder à cette demande d'assistance.",
        ));
    }
    Ok(Json(request).into_response())
}

/// `PUT /api/assistance-requests/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAssistanceRequestRequest>,
) -> ApiResult<Response> {
    Validator::new()
        .positive(
            "amountRequested",
            payload.amount_requested,
            "Le montant demandé doit être un nombre positif.",
        )
        .check()?;

    let request = AssistanceRequest::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demande d'assistance introuvable."))?;

    if !current_user.is_admin && request.user_id != current_user.id {
        return Err(ApiError::forbidden(
            "Non autorisé à mettre à jour cette demande d'assistance.",
        ));
    }

    if let Some(event_id) = payload.event_id {
        if !Event::exists(&state.pool, event_id).await? {
            return Err(ApiError::not_found("L'événement spécifié n'existe pas."));
        }
    }

    let updated = AssistanceRequest::update(
        &state.pool,
        id,
        AssistanceRequestUpdate {
            event_id: payload.event_id,
            title: payload.title,
            description: payload.description,
            amount_requested: payload.amount_requested,
            status: payload.status,
        },
    )
    .await?;

    Ok(Json(updated).into_response())
}

/// `DELETE /api/assistance-requests/:id`
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let request = AssistanceRequest::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demande d'assistance introuvable."))?;

    if !current_user.is_admin && request.user_id != current_user.id {
        return Err(ApiError::forbidden(
            "Non autorisé à supprimer cette demande d'assistance.",
        ));
    }

    AssistanceRequest::delete(&state.pool, id).await?;
    Ok(responses::deleted("Demande d'assistance supprimée avec succès."))
}
