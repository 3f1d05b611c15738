//! # Configuration System
//!
//! Layered configuration loading: packaged defaults, an optional per
//! environment TOML file, then `FAMFUND_`-prefixed environment variable
//! overrides. No silent hardcoded fallbacks outside this module.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use famfund::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let bind = config.server.bind_address.clone();
//! let pool_size = config.database.max_connections;
//! # Ok(())
//! # }
//! ```

mod loader;

use serde::{Deserialize, Serialize};

pub use loader::load;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Database connection and pooling configuration
    pub database: DatabaseConfig,

    /// JWT authentication settings
    pub auth: AuthConfig,

    /// List-endpoint pagination defaults
    pub pagination: PaginationConfig,

    /// CORS settings
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration for the current environment.
    pub fn load() -> crate::Result<Self> {
        loader::load()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            pagination: PaginationConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/famfund_development".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 10,
            idle_timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 signing secret. Must be overridden outside development.
    pub jwt_secret: String,
    pub jwt_token_expiry_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "your_jwt_secret".to_string(),
            jwt_token_expiry_hours: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:5000");
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.auth.jwt_token_expiry_hours, 1);
        assert!(config.database.max_connections >= config.database.min_connections);
    }
}
