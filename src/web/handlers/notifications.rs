//! # Notification Handlers
//!
//! Polymorphic notifications. Creation verifies that the referenced
//! notifiable record exists; marking as read is idempotent.

use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::{
    AssistanceRequest, Event, EventContribution, FamilyMeeting, MonthlyContribution, Sanction,
    User,
};
use crate::web::auth::CurrentUser;
use crate::web::authz::require_admin;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::responses;
use crate::web::state::AppState;
use crate::web::validation::Validator;

const ADMIN_ONLY: &str = "Accès non autorisé. Réservé aux administrateurs.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub notifiable_type: Option<String>,
    pub notifiable_id: Option<i64>,
    pub data: Option<serde_json::Value>,
}

/// Verify the referenced record exists for a supported notifiable type.
async fn check_notifiable(
    pool: &PgPool,
    notifiable_type: &str,
    notifiable_id: i64,
) -> ApiResult<()> {
    let found = match notifiable_type {
        "User" => User::exists(pool, notifiable_id).await?,
        "Event" => Event::exists(pool, notifiable_id).await?,
        "MonthlyContribution" => MonthlyContribution::exists(pool, notifiable_id).await?,
        "EventContribution" => EventContribution::exists(pool, notifiable_id).await?,
        "AssistanceRequest" => AssistanceRequest::exists(pool, notifiable_id).await?,
        "Sanction" => Sanction::exists(pool, notifiable_id).await?,
        "FamilyMeeting" => FamilyMeeting::exists(pool, notifiable_id).await?,
        _ => return Err(ApiError::bad_request("Type de notifiable non supporté.")),
    };
    if !found {
        return Err(ApiError::not_found("Ressource introuvable."));
    }
    Ok(())
}

fn can_access(notification: &Notification, current_user: &CurrentUser) -> bool {
    current_user.is_admin
        || (notification.notifiable_type == "User"
            && notification.notifiable_id == current_user.id)
}

/// `read=true` keeps read notifications; any other present value keeps
/// unread ones; an absent parameter keeps both.
fn read_filter(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| value == "true")
}

fn mark_read_message(notification: &Notification) -> &'static str {
    if notification.read_at.is_some() {
        "Notification déjà marquée comme lue."
    } else {
        "Notification marquée comme lue avec succès."
    }
}

/// `POST /api/notifications` (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateNotificationRequest>,
) -> ApiResult<Response> {
    require_admin(&current_user, ADMIN_ONLY)?;

    Validator::new()
        .require_str(
            "type",
            payload.notification_type.as_deref(),
            "Le type de notification est requis.",
        )
        .require_str(
            "notifiableType",
            payload.notifiable_type.as_deref(),
            "Le type de l'entité notifiable est requis.",
        )
        .require(
            "notifiableId",
            payload.notifiable_id.is_some(),
            "L'ID de l'entité notifiable est requis.",
        )
        .require("data", payload.data.is_some(), "Les données de la notification sont requises.")
        .check()?;

    let notifiable_type = payload.notifiable_type.unwrap_or_default();
    let notifiable_id = payload.notifiable_id.unwrap_or_default();
    check_notifiable(&state.pool, &notifiable_type, notifiable_id).await?;

    let notification = Notification::create(
        &state.pool,
        NewNotification {
            notification_type: payload.notification_type.unwrap_or_default(),
            notifiable_type,
            notifiable_id,
            data: payload.data.unwrap_or(serde_json::Value::Null),
        },
    )
    .await?;

    Ok(responses::created(
        "Notification créée avec succès.",
        "notification",
        &notification,
    ))
}

/// `GET /api/notifications`. Admins filter freely; members only see
/// notifications addressed to them.
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let read = read_filter(params.get("read").map(String::as_str));

    let filter = if current_user.is_admin {
        NotificationFilter {
            notification_type: params.get("type").cloned(),
            notifiable_type: params.get("notifiableType").cloned(),
            notifiable_id: params
                .get("notifiableId")
                .and_then(|raw| raw.parse::<i64>().ok()),
            read,
        }
    } else {
        NotificationFilter {
            notification_type: params.get("type").cloned(),
            notifiable_type: Some("User".to_string()),
            notifiable_id: Some(current_user.id),
            read,
        }
    };

    let notifications = Notification::list(&state.pool, filter).await?;
    Ok(Json(notifications).into_response())
}

/// `GET /api/notifications/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let notification = Notification::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification introuvable."))?;

    if !can_access(&notification, &current_user) {
        return Err(ApiError::forbidden("Accès non autorisé à cette notification."));
    }
    Ok(Json(notification).into_response())
}

/// `PUT /api/notifications/:id/read`. Idempotent; an already-read
/// notification keeps its timestamp.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let notification = Notification::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification introuvable."))?;

    if !can_access(&notification, &current_user) {
        return Err(ApiError::forbidden(
            "Non autorisé à marquer cette notification comme lue.",
        ));
    }

    let message = mark_read_message(&notification);
    if notification.read_at.is_some() {
        return Ok(Json(json!({
            "message": message,
            "notification": notification,
        }))
        .into_response());
    }

    let updated = Notification::mark_read(&state.pool, id).await?;
    Ok(Json(json!({
        "message": message,
        "notification": updated,
    }))
    .into_response())
}

/// `DELETE /api/notifications/:id` (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    require_admin(&current_user, "Non autorisé à supprimer les notifications.")?;

    if !Notification::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Notification introuvable."));
    }
    Ok(responses::deleted("Notification supprimée avec succès."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification(notifiable_type: &str, notifiable_id: i64) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            notification_type: "sanction.created".to_string(),
            notifiable_type: notifiable_type.to_string(),
            notifiable_id,
            data: json!({"message": "Une sanction a été appliquée."}),
            read_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_member_only_accesses_own_user_notifications() {
        let member = CurrentUser { id: 5, is_admin: false };
        assert!(can_access(&notification("User", 5), &member));
        assert!(!can_access(&notification("User", 6), &member));
        assert!(!can_access(&notification("Event", 5), &member));
    }

    #[test]
    fn test_admin_accesses_everything() {
        let admin = CurrentUser { id: 1, is_admin: true };
        assert!(can_access(&notification("Event", 9), &admin));
    }

    #[test]
    fn test_read_filter_treats_non_true_as_unread() {
        assert_eq!(read_filter(None), None);
        assert_eq!(read_filter(Some("true")), Some(true));
        assert_eq!(read_filter(Some("false")), Some(false));
        assert_eq!(read_filter(Some("yes")), Some(false));
        assert_eq!(read_filter(Some("")), Some(false));
    }

    #[test]
    fn test_already_read_guard_picks_the_idempotent_message() {
        let unread = notification("User", 5);
        assert_eq!(
            mark_read_message(&unread),
            "Notification marquée comme lue avec succès."
        );

        let mut read = notification("User", 5);
        read.read_at = Some(Utc::now());
        assert_eq!(mark_read_message(&read), "Notification déjà marquée comme lue.");
    }
}
