//! # Authorization Checks
//!
//! Reusable predicates over the authenticated caller. Handlers call these
//! instead of re-deriving role checks inline.

use crate::web::auth::CurrentUser;
use crate::web::errors::ApiError;

/// Admin-only access.
pub fn require_admin(current_user: &CurrentUser, message: &str) -> Result<(), ApiError> {
    if current_user.is_admin {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

/// Access for admins or the resource owner.
pub fn require_admin_or_owner(
    current_user: &CurrentUser,
    owner_id: i64,
    message: &str,
) -> Result<(), ApiError> {
    if current_user.is_admin || current_user.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: CurrentUser = CurrentUser {
        id: 1,
        is_admin: true,
    };
    const MEMBER: CurrentUser = CurrentUser {
        id: 2,
        is_admin: false,
    };

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&ADMIN, "non").is_ok());
        assert!(require_admin(&MEMBER, "non").is_err());
    }

    #[test]
    fn test_require_admin_or_owner() {
        assert!(require_admin_or_owner(&ADMIN, 99, "non").is_ok());
        assert!(require_admin_or_owner(&MEMBER, 2, "non").is_ok());
        assert!(require_admin_or_owner(&MEMBER, 3, "non").is_err());
    }

    #[test]
    fn test_forbidden_carries_message() {
        let err = require_admin(&MEMBER, "Accès interdit. Réservé aux administrateurs.")
            .unwrap_err();
        let (status, message) = err.status_and_message();
        assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
        assert_eq!(message, "Accès interdit. Réservé aux administrateurs.");
    }
}
