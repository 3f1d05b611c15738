//! # Monthly Contribution Handlers
//!
//! One contribution per member per (month, year); the duplicate answer
//! carries the conflicting record's id so clients can switch to an update.

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::models::monthly_contribution::{
    MonthlyContribution, MonthlyContributionUpdate, NewMonthlyContribution,
};
use crate::models::User;
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin_or_owner;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonthlyContributionRequest {
    pub user_id: Option<i64>,
    pub amount: Option<f64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonthlyContributionRequest {
    pub amount: Option<f64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyContributionListParams {
    pub user_id: Option<i64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

fn validate_period(month: Option<i32>, year: Option<i32>) -> Validator {
    Validator::new()
        .range(
            "month",
            month,
            1,
            12,
            "Le mois doit être un entier entre 1 et 12.",
        )
        .range(
            "year",
            year,
            1900,
            2100,
            "L'année doit être un entier valide (ex: 2024).",
        )
}

/// `POST /api/monthly-contributions` (admin or the contributing member)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateMonthlyContributionRequest>,
) -> ApiResult<Response> {
    validate_period(payload.month, payload.year)
        .require("userId", payload.user_id.is_some(), "L'ID de l'utilisateur est requis.")
        .require("amount", payload.amount.is_some(), "Le montant est requis.")
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .require("month", payload.month.is_some(), "Le mois est requis.")
        .require("year", payload.year.is_some(), "L'année est requise.")
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

    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found(
            "Utilisateur cible introuvable pour la contribution.",
        ));
    }

    let month = payload.month.unwrap_or_default();
    let year = payload.year.unwrap_or_default();
    if let Some(existing) =
        MonthlyContribution::find_for_period(&state.pool, user_id, month, year).await?
    {
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "message": "Une contribution existe déjà pour cet utilisateur pour le mois et \
                            l'année spécifiés. Veuillez la mettre à jour si nécessaire.",
                "existingContributionId": existing.id.to_string(),
            })),
        )
            .into_response());
    }

    let contribution = MonthlyContribution::create(
        &state.pool,
        NewMonthlyContribution {
            user_id,
            amount: payload.amount.unwrap_or_default(),
            month,
            year,
            payment_date: payload.payment_date.unwrap_or_else(Utc::now),
            payment_method: payload.payment_method,
            transaction_reference: payload.transaction_reference,
            notes: payload.notes,
        },
    )
    .await?;

    Ok(responses::created(
        "Contribution mensuelle créée avec succès.",
        "contribution",
        &contribution,
    ))
}

/// `GET /api/monthly-contributions`. Admins filter freely; members are
/// scoped to their own records.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<MonthlyContributionListParams>,
) -> ApiResult<Response> {
    let user_filter = if current_user.is_admin {
        params.user_id
    } else {
        Some(current_user.id)
    };

    let contributions =
        MonthlyContribution::list(&state.pool, user_filter, params.month, params.year).await?;
    Ok(Json(contributions).into_response())
}

/// `GET /api/monthly-contributions/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let contribution = MonthlyContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution mensuelle introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à cette contribution.",
    )?;
    Ok(Json(contribution).into_response())
}

/// `PUT /api/monthly-contributions/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMonthlyContributionRequest>,
) -> ApiResult<Response> {
    validate_period(payload.month, payload.year)
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .check()?;

    let contribution = MonthlyContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution mensuelle introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à la modification de cette contribution.",
    )?;

    let updated = MonthlyContribution::update(
        &state.pool,
        id,
        MonthlyContributionUpdate {
            amount: payload.amount,
            month: payload.month,
            year: payload.year,
            payment_date: payload.payment_date,
            payment_method: payload.payment_method,
            transaction_reference: payload.transaction_reference,
            notes: payload.notes,
        },
    )
    .await?;

    Ok(responses::updated(
        "Contribution mensuelle mise à jour avec succès.",
        "contribution",
        &updated,
    ))
}

/// `DELETE /api/monthly-contributions/:id`
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let contribution = MonthlyContribution::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contribution mensuelle introuvable."))?;

    require_admin_or_owner(
        &current_user,
        contribution.user_id,
        "Accès non autorisé à la suppression de cette contribution.",
    )?;

    MonthlyContribution::delete(&state.pool, id).await?;
    Ok(responses::deleted("Contribution mensuelle supprimée avec succès."))
}
