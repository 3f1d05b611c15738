//! # Fund Transaction Handlers
//!
//! Admin-only ledger of the association fund. Each entry may reference at
//! most one source record (monthly contribution, event contribution or
//! assistance request).

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::fund_transaction::{
    FundTransaction, FundTransactionFilter, FundTransactionUpdate, NewFundTransaction,
};
use crate::models::{AssistanceRequest, EventContribution, MonthlyContribution, User};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFundTransactionRequest {
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub balance_after: Option<f64>,
    pub created_by_id: Option<i64>,
    pub monthly_contribution_id: Option<i64>,
    pub event_contribution_id: Option<i64>,
    pub assistance_request_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFundTransactionRequest {
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub balance_after: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTransactionListParams {
    pub transaction_type: Option<String>,
    pub created_by_id: Option<i64>,
    pub monthly_contribution_id: Option<i64>,
    pub event_contribution_id: Option<i64>,
    pub assistance_request_id: Option<i64>,
}

/// `POST /api/fund-transactions` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateFundTransactionRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require_str(
            "transactionType",
            payload.transaction_type.as_deref(),
            "Le type de transaction est requis.",
        )
        .require("amount", payload.amount.is_some(), "Le montant est requis.")
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .require(
            "transactionDate",
            payload.transaction_date.is_some(),
            "La date de transaction est requise.",
        )
        .require(
            "balanceAfter",
            payload.balance_after.is_some(),
            "Le solde après transaction est requis.",
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
            "L'ID de l'administrateur créateur est requis.",
        ));
    }

    let new_transaction = NewFundTransaction {
        transaction_type: payload.transaction_type.unwrap_or_default(),
        amount: payload.amount.unwrap_or_default(),
        description: payload.description,
        transaction_date: payload.transaction_date.unwrap_or_else(Utc::now),
        balance_after: payload.balance_after.unwrap_or_default(),
        created_by_id,
        monthly_contribution_id: payload.monthly_contribution_id,
        event_contribution_id: payload.event_contribution_id,
        assistance_request_id: payload.assistance_request_id,
    };

    if new_transaction.linked_source_count() > 1 {
        return Err(ApiError::bad_request(
            "Une transaction de fonds ne peut être liée qu'à une seule source.",
        ));
    }

    if let Some(id) = new_transaction.monthly_contribution_id {
        if !MonthlyContribution::exists(&state.pool, id).await? {
            return Err(ApiError::not_found("Contribution mensuelle associée introuvable."));
        }
    }
    if let Some(id) = new_transaction.event_contribution_id {
        if !EventContribution::exists(&state.pool, id).await? {
            return Err(ApiError::not_found("Contribution d'événement associée introuvable."));
        }
    }
    if let Some(id) = new_transaction.assistance_request_id {
        if !AssistanceRequest::exists(&state.pool, id).await? {
            return Err(ApiError::not_found("Demande d'assistance associée introuvable."));
        }
    }

    let transaction = FundTransaction::create(&state.pool, new_transaction).await?;
    Ok(responses::created(
        "Transaction de fonds créée avec succès.",
        "fundTransaction",
        &transaction,
    ))
}

/// `GET /api/fund-transactions` (admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<FundTransactionListParams>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    let transactions = FundTransaction::list(
        &state.pool,
        FundTransactionFilter {
            transaction_type: params.transaction_type,
            created_by_id: params.created_by_id,
            monthly_contribution_id: params.monthly_contribution_id,
            event_contribution_id: params.event_contribution_id,
            assistance_request_id: params.assistance_request_id,
        },
    )
    .await?;
    Ok(Json(transactions).into_response())
}

/// `GET /api/fund-transactions/:id` (admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;
    let transaction = FundTransaction::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction de fonds introuvable."))?;
    Ok(Json(transaction).into_response())
}

/// `PUT /api/fund-transactions/:id` (admin; source links are immutable)
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFundTransactionRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .positive("amount", payload.amount, "Le montant doit être un nombre positif.")
        .check()?;

    if FundTransaction::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Transaction de fonds introuvable."));
    }

    let transaction = FundTransaction::update(
        &state.pool,
        id,
        FundTransactionUpdate {
            transaction_type: payload.transaction_type,
            amount: payload.amount,
            description: payload.description,
            transaction_date: payload.transaction_date,
            balance_after: payload.balance_after,
        },
    )
    .await?;

    Ok(responses::updated(
        "Transaction de fonds mise à jour avec succès.",
        "fundTransaction",
        &transaction,
    ))
}

/// `DELETE /api/fund-transactions/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    if !FundTransaction::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Transaction de fonds introuvable."));
    }
    Ok(responses::deleted("Transaction de fonds supprimée avec succès."))
}
