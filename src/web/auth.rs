//! # JWT Authentication
//!
//! HS256 token issuance and validation for member sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AuthConfig;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthFormat,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,
    pub email: String,
    pub is_admin: bool,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// The authenticated caller, inserted into request extensions by the
/// auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
    pub is_admin: bool,
}

/// HS256 authenticator built from the shared secret.
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl JwtAuthenticator {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry_hours: config.jwt_token_expiry_hours as i64,
        }
    }

    /// Issue a token for a user session.
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
        is_admin: bool,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate a token, distinguishing expiry from every other failure so
    /// the middleware can answer with the right message.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                warn!(error = %e, "JWT validation failed");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;
        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization: Bearer` header value.
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthFormat)?;
        if token.is_empty() {
            return Err(AuthError::InvalidAuthFormat);
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::from_config(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_token_expiry_hours: 1,
        })
    }

    #[test]
    fn test_token_roundtrip() {
        let auth = authenticator();
        let token = auth.generate_token(42, "a@b.test", true).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@b.test");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = authenticator();
        let other = JwtAuthenticator::from_config(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            jwt_token_expiry_hours: 1,
        });

        let token = other.generate_token(1, "a@b.test", false).unwrap();
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            authenticator().validate_token("not-a-jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            JwtAuthenticator::extract_bearer_token("Bearer abc123").unwrap(),
            "abc123"
        );
        assert!(JwtAuthenticator::extract_bearer_token("Basic abc123").is_err());
        assert!(JwtAuthenticator::extract_bearer_token("Bearer ").is_err());
        assert!(JwtAuthenticator::extract_bearer_token("abc123").is_err());
    }
}
