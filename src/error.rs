//! Structured error handling for the non-HTTP surface of the service.
//!
//! HTTP-facing errors live in [`crate::web::errors`]; this type covers
//! bootstrap failures (configuration, pool construction) and anything a
//! library consumer may hit outside a request context.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}
