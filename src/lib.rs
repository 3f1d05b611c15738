#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Famfund
//!
//! REST backend for a family-association fund: members, monthly and event
//! contributions, assistance requests, fund transactions, sanctions, family
//! meetings, attendances, notifications and settings.
//!
//! ## Architecture
//!
//! Every route follows the same shape: authenticate (JWT bearer token),
//! authorize by role or ownership, validate the input, perform a single
//! entity CRUD operation against PostgreSQL through SQLx, and return JSON.
//!
//! ## Module Organization
//!
//! - [`models`] - Data layer: one SQLx-backed record type per entity
//! - [`query_builder`] - Query-parameter to filter/sort/paginate translation
//! - [`web`] - Axum routers, handlers, middleware and error mapping
//! - [`database`] - Connection pool construction and shutdown
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling for the non-HTTP surface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use famfund::config::AppConfig;
//! use famfund::database;
//! use famfund::web;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load()?;
//! let pool = database::connect(&config.database).await?;
//! web::serve(config, pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod web;

pub use error::{Error, Result};
