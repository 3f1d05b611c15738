//! # Web Application State
//!
//! Shared state handed to every handler: the database pool, the loaded
//! configuration and the JWT authenticator.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::web::auth::JwtAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub authenticator: JwtAuthenticator,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let authenticator = JwtAuthenticator::from_config(&config.auth);
        Self {
            pool,
            config: Arc::new(config),
            authenticator,
        }
    }
}
