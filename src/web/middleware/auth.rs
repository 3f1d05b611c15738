//! # Authentication Middleware
//!
//! Applied to every protected route: extracts the bearer token, verifies
//! it, confirms the subject still exists, and inserts a [`CurrentUser`]
//! into request extensions for handlers and authorization checks.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::models::User;
use crate::web::auth::{AuthError, CurrentUser, JwtAuthenticator};
use crate::web::errors::ApiError;
use crate::web::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Non autorisé, aucun token fourni."))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Non autorisé, token invalide."))?;

    let token = JwtAuthenticator::extract_bearer_token(auth_str)
        .map_err(|_| ApiError::unauthorized("Non autorisé, aucun token fourni."))?;

    let claims = state
        .authenticator
        .validate_token(token)
        .map_err(|e| match e {
            AuthError::TokenExpired => ApiError::unauthorized("Non autorisé, token expiré."),
            _ => ApiError::unauthorized("Non autorisé, token invalide."),
        })?;

    // The token may outlive the account.
    if !User::exists(&state.pool, claims.sub).await? {
        return Err(ApiError::unauthorized("Non autorisé, utilisateur non trouvé."));
    }

    debug!(user_id = claims.sub, is_admin = claims.is_admin, "authenticated request");

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        is_admin: claims.is_admin,
    });

    Ok(next.run(request).await)
}
